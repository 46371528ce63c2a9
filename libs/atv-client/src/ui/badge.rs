use super::escape_html;

/// A CSS-classed label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub class: &'static str,
    pub label: String,
}

impl Badge {
    #[must_use]
    pub fn render_html(&self) -> String {
        format!(
            r#"<span class="badge {}">{}</span>"#,
            self.class,
            escape_html(&self.label)
        )
    }
}

const NEUTRAL: &str = "badge-secondary";

/// (status, class, label) for ATV and rental states
static STATUSES: &[(&str, &str, &str)] = &[
    ("available", "badge-success", "Available"),
    ("rented", "badge-warning", "Rented"),
    ("maintenance", "badge-danger", "Maintenance"),
    ("pending", "badge-info", "Pending"),
    ("approved", "badge-success", "Approved"),
    ("denied", "badge-danger", "Denied"),
    ("cancelled", "badge-danger", "Cancelled"),
    ("pending_return", "badge-warning", "Pending Return"),
    ("returned", "badge-secondary", "Returned"),
];

static ROLES: &[(&str, &str)] = &[
    ("admin", "badge-danger"),
    ("manager", "badge-warning"),
    ("customer", "badge-info"),
];

/// Badge for an ATV/rental status; unknown values keep their raw text.
#[must_use]
pub fn status_badge(status: &str) -> Badge {
    STATUSES
        .iter()
        .find(|(s, _, _)| *s == status)
        .map_or_else(
            || Badge {
                class: NEUTRAL,
                label: status.to_owned(),
            },
            |&(_, class, label)| Badge {
                class,
                label: label.to_owned(),
            },
        )
}

/// Badge for a role with its first letter capitalized.
#[must_use]
pub fn role_badge(role: &str) -> Badge {
    let class = ROLES
        .iter()
        .find(|(r, _)| *r == role)
        .map_or(NEUTRAL, |&(_, class)| class);
    Badge {
        class,
        label: capitalize(role),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

use crate::config::AppConfig;
use crate::models::UserProfile;
use crate::session::Session;

/// Which navigation groups to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavVisibility {
    /// `.nav-guest`
    pub guest: bool,
    /// `.nav-user`
    pub user: bool,
    /// `.nav-manage`
    pub manage: bool,
    /// `.nav-admin`
    pub admin: bool,
}

impl NavVisibility {
    /// Visibility for the current session.
    ///
    /// A profile without a token counts as signed out.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self::for_user(session.current_user().as_ref())
    }

    #[must_use]
    pub fn for_user(user: Option<&UserProfile>) -> Self {
        match user {
            None => Self {
                guest: true,
                ..Self::default()
            },
            Some(user) => Self {
                guest: false,
                user: true,
                manage: user.role.can_manage(),
                admin: user.role == crate::models::Role::Admin,
            },
        }
    }
}

/// Display fields for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavUser {
    pub first_name: String,
    pub full_name: String,
    pub email: String,
    /// Capitalized role
    pub role_label: String,
    pub avatar_url: String,
}

impl NavUser {
    #[must_use]
    pub fn from_session(session: &Session, config: &AppConfig) -> Option<Self> {
        session
            .current_user()
            .map(|user| Self::from_profile(&user, config))
    }

    #[must_use]
    pub fn from_profile(user: &UserProfile, config: &AppConfig) -> Self {
        Self {
            first_name: user.first_name.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
            role_label: user.role.label().to_owned(),
            avatar_url: config.avatar_url(user.avatar.as_deref()),
        }
    }
}

//! User-facing message catalog and the error classifier.
//!
//! [`error_message`] matches the backend's `code` first. Responses without a
//! known code fall back to substring matching on the message text, which
//! breaks silently if the backend rewords its messages; treat its output as a
//! best guess.

use crate::api::ApiError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Message group, one per domain area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    Auth,
    Profile,
    Atv,
    Rental,
    User,
    General,
}

impl Area {
    pub const ALL: [Area; 6] = [
        Area::Auth,
        Area::Profile,
        Area::Atv,
        Area::Rental,
        Area::User,
        Area::General,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Area::Auth => "auth",
            Area::Profile => "profile",
            Area::Atv => "atv",
            Area::Rental => "rental",
            Area::User => "user",
            Area::General => "general",
        }
    }

    /// Every message registered for the area
    #[must_use]
    pub fn messages(self) -> &'static [MessageDef] {
        match self {
            Area::Auth => AUTH,
            Area::Profile => PROFILE,
            Area::Atv => ATV,
            Area::Rental => RENTAL,
            Area::User => USER,
            Area::General => GENERAL,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message area '{0}'")]
pub struct UnknownArea(pub String);

impl FromStr for Area {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Area::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownArea(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageDef {
    pub key: &'static str,
    pub text: &'static str,
}

const fn msg(key: &'static str, text: &'static str) -> MessageDef {
    MessageDef { key, text }
}

static AUTH: &[MessageDef] = &[
    msg("loginSuccess", "Welcome back! Redirecting to dashboard..."),
    msg("loginFailed", "Invalid email/username or password. Please try again."),
    msg(
        "loginNotVerified",
        "Please verify your email before logging in. Check your inbox for the verification link.",
    ),
    msg("loginError", "An error occurred during login. Please try again."),
    msg(
        "registerSuccess",
        "Account created successfully! Please check your email to verify your account.",
    ),
    msg(
        "registerFailed",
        "Registration failed. Please check your information and try again.",
    ),
    msg(
        "registerEmailExists",
        "This email is already registered. Please login or use a different email.",
    ),
    msg(
        "registerUsernameExists",
        "This username is already taken. Please choose another one.",
    ),
    msg("logoutSuccess", "You have been logged out successfully."),
    msg(
        "verifySuccess",
        "Email verified successfully! You can now login to your account.",
    ),
    msg(
        "verifyFailed",
        "Verification failed. The link may be invalid or expired. Please request a new verification email.",
    ),
    msg(
        "verifyExpired",
        "This verification link has expired. Please register again or contact support.",
    ),
    msg(
        "passwordResetRequestSent",
        "If the email exists, a password reset link has been sent to your inbox.",
    ),
    msg(
        "passwordResetSuccess",
        "Password reset successfully! Redirecting to login...",
    ),
    msg(
        "passwordResetFailed",
        "Password reset failed. The link may be invalid or expired.",
    ),
    msg(
        "passwordResetExpired",
        "This reset link has expired. Please request a new password reset.",
    ),
    msg("passwordChangeSuccess", "Password changed successfully!"),
    msg(
        "passwordChangeFailed",
        "Failed to change password. Please check your current password.",
    ),
    msg("passwordMismatch", "New passwords do not match. Please try again."),
    msg("passwordIncorrect", "Current password is incorrect."),
    msg("passwordWeak", "Password must be at least 8 characters long."),
];

static PROFILE: &[MessageDef] = &[
    msg("updateSuccess", "Profile updated successfully!"),
    msg("updateFailed", "Failed to update profile. Please try again."),
    msg("avatarUploadSuccess", "Avatar uploaded successfully!"),
    msg(
        "avatarUploadFailed",
        "Failed to upload avatar. Please ensure the file is an image (JPG, PNG, GIF).",
    ),
    msg("avatarUploadTooLarge", "Image file is too large. Maximum size is 2MB."),
];

static ATV: &[MessageDef] = &[
    msg("loadFailed", "Failed to load ATVs. Please refresh the page."),
    msg("createSuccess", "ATV added successfully!"),
    msg(
        "createFailed",
        "Failed to add ATV. Please check all fields and try again.",
    ),
    msg("updateSuccess", "ATV updated successfully!"),
    msg("updateFailed", "Failed to update ATV. Please try again."),
    msg("deleteSuccess", "ATV deleted successfully!"),
    msg(
        "deleteFailed",
        "Failed to delete ATV. This ATV may have active rentals.",
    ),
    msg(
        "deleteWithRentals",
        "Cannot delete ATV with active rentals. Complete or cancel all rentals first.",
    ),
    msg("notFound", "ATV not found."),
    msg(
        "notAvailable",
        "This ATV is not available for rental at the moment.",
    ),
    msg(
        "alreadyBooked",
        "This ATV is already booked for the selected time period.",
    ),
];

static RENTAL: &[MessageDef] = &[
    msg("loadFailed", "Failed to load rentals. Please refresh the page."),
    msg(
        "createSuccess",
        "Rental request submitted successfully! You will be notified once it's approved.",
    ),
    msg(
        "createFailed",
        "Failed to submit rental request. Please try again.",
    ),
    msg("updateStatusSuccess", "Rental status updated successfully!"),
    msg(
        "updateStatusFailed",
        "Failed to update rental status. Please try again.",
    ),
    msg(
        "requestReturnSuccess",
        "Return request submitted. Please wait for manager confirmation.",
    ),
    msg(
        "requestReturnFailed",
        "Failed to submit return request. Please try again.",
    ),
    msg(
        "cannotRequestReturn",
        "You can only request return when rental status is \"rented\".",
    ),
    msg("notFound", "Rental not found."),
    msg(
        "invalidStatusChange",
        "Cannot change status. Invalid status transition.",
    ),
    msg(
        "overlap",
        "This ATV is already booked for the selected time period.",
    ),
];

static USER: &[MessageDef] = &[
    msg("loadFailed", "Failed to load users. Please refresh the page."),
    msg("updateSuccess", "User updated successfully!"),
    msg("updateFailed", "Failed to update user. Please try again."),
    msg("deleteSuccess", "User deleted successfully!"),
    msg(
        "deleteFailed",
        "Failed to delete user. This user may have active rentals.",
    ),
    msg(
        "deleteWithRentals",
        "Cannot delete user with active rentals. Complete or cancel all rentals first.",
    ),
    msg("deleteSelf", "You cannot delete your own account."),
    msg("notFound", "User not found."),
    msg("cannotChangeOwnRole", "You cannot change your own role."),
];

static GENERAL: &[MessageDef] = &[
    msg("loading", "Loading..."),
    msg("saving", "Saving..."),
    msg("processing", "Processing..."),
    msg("success", "Operation completed successfully!"),
    msg("error", "An error occurred. Please try again."),
    msg(
        "networkError",
        "Network error. Please check your internet connection.",
    ),
    msg("unauthorized", "You are not authorized to perform this action."),
    msg("notAuthenticated", "Please login to continue."),
    msg("sessionExpired", "Your session has expired. Please login again."),
    msg("validationError", "Please check the form for errors."),
    msg(
        "confirmDelete",
        "Are you sure you want to delete this item? This action cannot be undone.",
    ),
    msg("noData", "No data available."),
    msg("searchNoResults", "No results found. Try adjusting your search."),
    msg("notFound", "Item not found."),
];

/// Backend error codes with a dedicated message
static ERROR_CODES: &[(&str, Area, &str)] = &[
    ("invalid_credentials", Area::Auth, "loginFailed"),
    ("email_not_verified", Area::Auth, "loginNotVerified"),
    ("email_taken", Area::Auth, "registerEmailExists"),
    ("username_taken", Area::Auth, "registerUsernameExists"),
    ("password_incorrect", Area::Auth, "passwordIncorrect"),
    ("password_reset_expired", Area::Auth, "passwordResetExpired"),
    ("verification_expired", Area::Auth, "verifyExpired"),
    ("unauthenticated", Area::General, "sessionExpired"),
    ("forbidden", Area::General, "unauthorized"),
    ("atv_not_available", Area::Atv, "notAvailable"),
    ("atv_has_active_rentals", Area::Atv, "deleteWithRentals"),
    ("rental_overlap", Area::Rental, "overlap"),
    ("invalid_status_transition", Area::Rental, "invalidStatusChange"),
    ("user_has_active_rentals", Area::User, "deleteWithRentals"),
    ("cannot_delete_self", Area::User, "deleteSelf"),
    ("cannot_change_own_role", Area::User, "cannotChangeOwnRole"),
];

#[must_use]
pub fn lookup(area: Area, key: &str) -> Option<&'static str> {
    area.messages()
        .iter()
        .find(|m| m.key == key)
        .map(|m| m.text)
}

/// Lookup for entries that are known to exist in the tables above.
fn text(area: Area, key: &str) -> &'static str {
    lookup(area, key).unwrap_or("An error occurred. Please try again.")
}

/// Friendly text for a failed call.
#[must_use]
pub fn error_message(error: &ApiError) -> Cow<'_, str> {
    if let Some(code) = error.code.as_deref()
        && let Some((_, area, key)) = ERROR_CODES.iter().find(|(c, _, _)| *c == code)
    {
        return Cow::Borrowed(text(*area, key));
    }

    let message = error.message.to_lowercase();
    let matched = if message.contains("invalid credential") || message.contains("invalid email")
    {
        Some((Area::Auth, "loginFailed"))
    } else if message.contains("not verified") || message.contains("verify") {
        Some((Area::Auth, "loginNotVerified"))
    } else if message.contains("email exists")
        || message.contains("email has already been taken")
    {
        Some((Area::Auth, "registerEmailExists"))
    } else if message.contains("username exists")
        || message.contains("username has already been taken")
    {
        Some((Area::Auth, "registerUsernameExists"))
    } else if message.contains("password") && message.contains("incorrect") {
        Some((Area::Auth, "passwordIncorrect"))
    } else if message.contains("expired") {
        if message.contains("reset") {
            Some((Area::Auth, "passwordResetExpired"))
        } else {
            Some((Area::Auth, "verifyExpired"))
        }
    } else if message.contains("unauthorized") {
        Some((Area::General, "sessionExpired"))
    } else {
        status_bucket(error.status)
    };

    match matched {
        Some((area, key)) => Cow::Borrowed(text(area, key)),
        None if !error.message.is_empty() => Cow::Borrowed(error.message.as_str()),
        None => Cow::Borrowed(text(Area::General, "error")),
    }
}

fn status_bucket(status: u16) -> Option<(Area, &'static str)> {
    match status {
        401 => Some((Area::General, "sessionExpired")),
        403 => Some((Area::General, "unauthorized")),
        404 => Some((Area::General, "notFound")),
        422 => Some((Area::General, "validationError")),
        0 | 500.. => Some((Area::General, "networkError")),
        _ => None,
    }
}

/// `<action>Success` from `area`, or the generic success text.
///
/// An unknown area name falls back to the general messages.
#[must_use]
pub fn success_message(action: &str, area: &str) -> &'static str {
    let area = area.parse().unwrap_or(Area::General);
    lookup(area, &format!("{action}Success")).unwrap_or_else(|| text(Area::General, "success"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn err(status: u16, message: &str) -> ApiError {
        ApiError::new(status, message)
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            lookup(Area::Auth, "logoutSuccess"),
            Some("You have been logged out successfully.")
        );
        assert_eq!(lookup(Area::General, "notFound"), Some("Item not found."));
        assert_eq!(lookup(Area::Atv, "nope"), None);
        assert_eq!("rental".parse::<Area>().unwrap(), Area::Rental);
        assert!("billing".parse::<Area>().is_err());
    }

    #[test]
    fn test_email_taken_beats_validation_bucket() {
        let api_err = err(422, "The email has already been taken.");
        let msg = error_message(&api_err);
        assert_eq!(
            msg,
            "This email is already registered. Please login or use a different email."
        );
    }

    #[test]
    fn test_substring_priority_order() {
        // "verify" wins over "expired"
        assert_eq!(
            error_message(&err(400, "Verify link expired")),
            text(Area::Auth, "loginNotVerified")
        );
        assert_eq!(
            error_message(&err(400, "Reset token expired")),
            text(Area::Auth, "passwordResetExpired")
        );
        assert_eq!(
            error_message(&err(400, "Link expired")),
            text(Area::Auth, "verifyExpired")
        );
        assert_eq!(
            error_message(&err(400, "The password you entered is incorrect")),
            text(Area::Auth, "passwordIncorrect")
        );
        assert_eq!(
            error_message(&err(401, "Invalid credentials")),
            text(Area::Auth, "loginFailed")
        );
        assert_eq!(
            error_message(&err(400, "Unauthorized.")),
            text(Area::General, "sessionExpired")
        );
    }

    #[test]
    fn test_status_buckets_and_raw_message() {
        assert_eq!(
            error_message(&err(401, "Unauthenticated.")),
            text(Area::General, "sessionExpired")
        );
        assert_eq!(
            error_message(&err(403, "This action is forbidden.")),
            text(Area::General, "unauthorized")
        );
        assert_eq!(error_message(&err(404, "No query results")), "Item not found.");
        assert_eq!(
            error_message(&err(422, "The given data was invalid.")),
            text(Area::General, "validationError")
        );
        assert_eq!(
            error_message(&ApiError::network()),
            text(Area::General, "networkError")
        );
        assert_eq!(
            error_message(&err(503, "Service Unavailable")),
            text(Area::General, "networkError")
        );
        assert_eq!(
            error_message(&err(409, "ATV is in use")),
            "ATV is in use"
        );
        assert_eq!(error_message(&err(409, "")), text(Area::General, "error"));
    }

    #[test]
    fn test_structured_code_first() {
        let mut error = err(422, "The given data was invalid.");
        error.code = Some("rental_overlap".to_owned());
        assert_eq!(error_message(&error), text(Area::Rental, "overlap"));

        error.code = Some("something_new".to_owned());
        assert_eq!(error_message(&error), text(Area::General, "validationError"));
    }

    #[test]
    fn test_success_message() {
        assert_eq!(success_message("create", "atv"), "ATV added successfully!");
        assert_eq!(
            success_message("avatarUpload", "profile"),
            "Avatar uploaded successfully!"
        );
        assert_eq!(
            success_message("archive", "atv"),
            "Operation completed successfully!"
        );
        assert_eq!(
            success_message("create", "billing"),
            "Operation completed successfully!"
        );
    }
}

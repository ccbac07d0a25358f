//! Role-gated view access
//!
//! Pure function of the locally cached session state at decision time; the
//! role is trusted as cached and never revalidated against the server.

use crate::models::{Role, UserData};

pub const LOGIN_VIEW: &str = "/login";

/// A guarded view and the roles allowed to reach it.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub path: &'static str,
    pub allowed: &'static [Role],
}

/// Known role-gated views.
pub const USER_DASHBOARD: View = View {
    path: "/user/dashboard",
    allowed: &[Role::User],
};
pub const USER_CHAT: View = View {
    path: "/user/chat",
    allowed: &[Role::User],
};
pub const DERMATOLOGIST_DASHBOARD: View = View {
    path: "/dermatologist/dashboard",
    allowed: &[Role::Dermatologist],
};
pub const DERMATOLOGIST_CHAT: View = View {
    path: "/dermatologist/chat",
    allowed: &[Role::Dermatologist],
};
pub const DERMATOLOGIST_PATIENTS: View = View {
    path: "/dermatologist/patients",
    allowed: &[Role::Dermatologist],
};
pub const ADMIN_DASHBOARD: View = View {
    path: "/admin/dashboard",
    allowed: &[Role::Admin],
};

/// Default landing view per role.
pub fn landing(role: Role) -> &'static str {
    match role {
        Role::User => USER_DASHBOARD.path,
        Role::Dermatologist => DERMATOLOGIST_DASHBOARD.path,
        Role::Admin => ADMIN_DASHBOARD.path,
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the requested view.
    Grant,
    /// Unauthenticated: go to the login view.
    RedirectLogin,
    /// Authenticated but not permitted: go to this role's own landing view.
    RedirectHome(Role),
}

impl Access {
    /// Where a redirect outcome sends the user.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Access::Grant => None,
            Access::RedirectLogin => Some(LOGIN_VIEW),
            Access::RedirectHome(role) => Some(landing(*role)),
        }
    }
}

/// Decide whether the current session may render `view`.
pub fn check(user: Option<&UserData>, authenticated: bool, view: &View) -> Access {
    if !authenticated {
        return Access::RedirectLogin;
    }

    match user {
        Some(user) if view.allowed.contains(&user.role) => Access::Grant,
        Some(user) => Access::RedirectHome(user.role),
        // Authenticated without a profile cannot happen via the session
        // store; treat defensively as unauthenticated.
        None => Access::RedirectLogin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: &str) -> UserData {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "x@example.com",
            "name": "X",
            "role": role,
        }))
        .unwrap()
    }

    #[test]
    fn unauthenticated_goes_to_login() {
        let access = check(None, false, &ADMIN_DASHBOARD);
        assert_eq!(access, Access::RedirectLogin);
        assert_eq!(access.redirect_target(), Some("/login"));
    }

    #[test]
    fn wrong_role_redirects_to_own_landing() {
        let patient = user_with_role("USER");
        let derm = user_with_role("DERMATOLOGISTS");

        // A patient hitting any non-USER view always lands on the patient
        // dashboard, never the requested view or a third role's home.
        for view in [&ADMIN_DASHBOARD, &DERMATOLOGIST_DASHBOARD, &DERMATOLOGIST_PATIENTS] {
            let access = check(Some(&patient), true, view);
            assert_eq!(access, Access::RedirectHome(Role::User));
            assert_eq!(access.redirect_target(), Some("/user/dashboard"));
        }

        let access = check(Some(&derm), true, &ADMIN_DASHBOARD);
        assert_eq!(access.redirect_target(), Some("/dermatologist/dashboard"));
    }

    #[test]
    fn permitted_role_is_granted() {
        let admin = user_with_role("ADMIN");
        assert_eq!(check(Some(&admin), true, &ADMIN_DASHBOARD), Access::Grant);

        let derm = user_with_role("DERMATOLOGISTS");
        assert_eq!(check(Some(&derm), true, &DERMATOLOGIST_CHAT), Access::Grant);
    }

    #[test]
    fn token_without_profile_is_unauthenticated() {
        assert_eq!(check(None, true, &USER_DASHBOARD), Access::RedirectLogin);
    }
}

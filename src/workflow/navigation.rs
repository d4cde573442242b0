use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::schemas::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Login,
    ForgetPassword,
    Payment,
    StudentDashboard,
    TeacherDashboard,
    QaoAccess,
    QaoDashboard,
    AdminDashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::ForgetPassword => "/forget-password",
            Route::Payment => "/payment",
            Route::StudentDashboard => "/student/dashboard",
            Route::TeacherDashboard => "/teacher/dashboard",
            Route::QaoAccess => "/qao/access",
            Route::QaoDashboard => "/qao/dashboard",
            Route::AdminDashboard => "/admin/dashboard",
        }
    }

    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Student => Route::StudentDashboard,
            Role::Teacher => Route::TeacherDashboard,
            Role::Qao => Route::QaoDashboard,
            Role::Admin => Route::AdminDashboard,
        }
    }

    /// Where a role lands after logging out or having its token rejected.
    pub fn sign_in_for(role: Role) -> Self {
        match role {
            Role::Qao => Route::QaoAccess,
            _ => Route::Login,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation instruction returned by flows instead of performing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub route: Route,
    #[serde(rename = "delayMs", serialize_with = "as_millis")]
    pub delay: Duration,
}

impl Redirect {
    pub fn now(route: Route) -> Self {
        Self { route, delay: Duration::ZERO }
    }

    pub fn after(route: Route, delay: Duration) -> Self {
        Self { route, delay }
    }

    pub fn path(&self) -> &'static str {
        self.route.path()
    }
}

fn as_millis<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qao_signs_in_through_access_gate() {
        assert_eq!(Route::sign_in_for(Role::Qao).path(), "/qao/access");
        assert_eq!(Route::sign_in_for(Role::Teacher).path(), "/login");
        assert_eq!(Route::dashboard_for(Role::Student).path(), "/student/dashboard");
    }

    #[test]
    fn redirect_serializes_path_and_delay() {
        let redirect = Redirect::after(Route::StudentDashboard, Duration::from_millis(1500));
        let value = serde_json::to_value(redirect).expect("json");
        assert_eq!(value["route"], "student_dashboard");
        assert_eq!(value["delayMs"], 1500);
    }
}

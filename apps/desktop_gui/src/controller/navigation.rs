//! Routes, bottom tabs and form factor detection for the admin shell.

use shared::domain::TemplateId;

/// Viewports narrower than this are laid out for phones.
pub const COMPACT_BREAKPOINT: f32 = 768.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Articles,
    Templates,
    TemplateDetail(TemplateId),
    Calendar,
    Settings,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "/login" => Route::Login,
            "/articles" => Route::Articles,
            "/templates" => Route::Templates,
            "/calendar" => Route::Calendar,
            "/settings" => Route::Settings,
            _ => match trimmed.strip_prefix("/templates/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Route::TemplateDetail(TemplateId::from(id))
                }
                _ => Route::Dashboard,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => Tab::Dashboard.path().to_string(),
            Route::Articles => Tab::Articles.path().to_string(),
            Route::Templates => Tab::Templates.path().to_string(),
            Route::TemplateDetail(id) => format!("/templates/{id}"),
            Route::Calendar => Tab::Calendar.path().to_string(),
            Route::Settings => Tab::Settings.path().to_string(),
        }
    }

    /// The highlighted bottom tab. The login screen has no tab bar.
    pub fn active_tab(&self) -> Option<Tab> {
        match self {
            Route::Login => None,
            other => Some(Tab::for_path(&other.path())),
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Articles,
    Templates,
    Calendar,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Articles,
        Tab::Templates,
        Tab::Calendar,
        Tab::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Tab::Dashboard => "/dashboard",
            Tab::Articles => "/articles",
            Tab::Templates => "/templates",
            Tab::Calendar => "/calendar",
            Tab::Settings => "/settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Articles => "Articles",
            Tab::Templates => "Templates",
            Tab::Calendar => "Calendar",
            Tab::Settings => "Settings",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Dashboard => "▦",
            Tab::Articles => "📄",
            Tab::Templates => "🗐",
            Tab::Calendar => "📅",
            Tab::Settings => "⚙",
        }
    }

    /// Exact match, or prefix match for every tab but the dashboard.
    pub fn for_path(path: &str) -> Tab {
        Tab::ALL
            .into_iter()
            .find(|tab| {
                path == tab.path() || (*tab != Tab::Dashboard && path.starts_with(tab.path()))
            })
            .unwrap_or(Tab::Dashboard)
    }

    pub fn route(self) -> Route {
        match self {
            Tab::Dashboard => Route::Dashboard,
            Tab::Articles => Route::Articles,
            Tab::Templates => Route::Templates,
            Tab::Calendar => Route::Calendar,
            Tab::Settings => Route::Settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Compact,
    Wide,
}

impl FormFactor {
    pub fn detect(viewport_width: f32, touch_primary: bool) -> Self {
        if touch_primary || viewport_width < COMPACT_BREAKPOINT {
            FormFactor::Compact
        } else {
            FormFactor::Wide
        }
    }

    pub fn is_compact(self) -> bool {
        self == FormFactor::Compact
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;

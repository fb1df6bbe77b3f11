// Redirect command for platform-based page redirects

use super::user_agent_info;
use crate::compat::{ClientApp, Location, PageContext, corrected_location_for_platform};
use crate::config::Settings;
use crate::ui;
use log::debug;

pub struct RedirectArgs {
    pub path: String,
    pub search: String,
    pub client_app: Option<String>,
    pub lang: Option<String>,
    pub home: bool,
    pub user_agent: Option<String>,
}

/// Split "/path?query" into a location; an explicit search string wins
fn location(path: &str, search: &str) -> Location {
    let (pathname, inline_search) = match path.find('?') {
        Some(pos) => (&path[..pos], &path[pos..]),
        None => (path, ""),
    };

    let search = if search.is_empty() { inline_search } else { search };
    let search = match search {
        "" => String::new(),
        s if s.starts_with('?') => s.to_string(),
        s => format!("?{}", s),
    };

    Location::new(pathname, search)
}

/// The client app segment of "/{lang}/{app}/...", if it names one
fn client_app_from_path(pathname: &str) -> Option<ClientApp> {
    pathname
        .split('/')
        .filter(|segment| !segment.is_empty())
        .nth(1)
        .and_then(|segment| segment.parse().ok())
}

/// Prints the corrected location. Returns exit code 1 when there is nothing to redirect to.
pub fn redirect(args: RedirectArgs) -> anyhow::Result<i32> {
    let settings = Settings::load_or_default()?;
    let location = location(&args.path, &args.search);

    let client_app = match args.client_app.as_deref() {
        Some(value) => value.parse()?,
        None => match client_app_from_path(&location.pathname) {
            Some(app) => app,
            None => settings.client_app()?,
        },
    };
    let lang = args.lang.unwrap_or(settings.lang);
    let user_agent_info = user_agent_info(args.user_agent.as_deref());

    debug!(
        "Checking redirect for {:?} (client app {}, lang {})",
        location, client_app, lang
    );

    let page = PageContext {
        client_app,
        is_home_page: args.home,
        lang: &lang,
        location: &location,
        user_agent_info: &user_agent_info,
    };

    match corrected_location_for_platform(&page) {
        Some(target) => {
            ui::plain(&target);
            Ok(0)
        }
        None => {
            ui::dim("No redirect needed");
            Ok(1)
        }
    }
}

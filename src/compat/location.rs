// Redirects between the desktop and Android halves of the site

use crate::compat::model::ClientApp;
use crate::compat::user_agent::{UserAgentInfo, is_firefox, is_firefox_for_android, is_firefox_for_ios};

/// Path and query string of the page being rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Includes the leading `?` when not empty
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }
}

/// Everything needed to decide whether a page should send the browser elsewhere
pub struct PageContext<'a> {
    /// Client app segment the page was rendered for
    pub client_app: ClientApp,
    pub is_home_page: bool,
    pub lang: &'a str,
    pub location: &'a Location,
    pub user_agent_info: &'a UserAgentInfo,
}

pub fn mobile_homepage_link(lang: &str) -> String {
    format!("/{}/{}/", lang, ClientApp::Android)
}

/// Where to send a browser that landed on the wrong client app, if anywhere
pub fn corrected_location_for_platform(page: &PageContext<'_>) -> Option<String> {
    let user_agent_info = page.user_agent_info;

    if is_firefox_for_ios(user_agent_info) || !is_firefox(user_agent_info) {
        return None;
    }

    if is_firefox_for_android(user_agent_info) {
        let stays_put = page.client_app == ClientApp::Android
            && (page.is_home_page || page.location.pathname.contains("/search/"));
        if stays_put {
            return None;
        }
        return Some(mobile_homepage_link(page.lang));
    }

    if page.client_app == ClientApp::Android {
        let pathname = desktop_pathname(&page.location.pathname, page.lang);
        return Some(format!("{}{}", pathname, page.location.search));
    }

    None
}

/// Swap the client app segment of `/{lang}/android/...` for `firefox`
///
/// Slugs further down the path are never touched. A path missing its lang
/// segment gets `lang`; a path with no client app segment at all goes to the
/// desktop homepage.
fn desktop_pathname(pathname: &str, lang: &str) -> String {
    let android = ClientApp::Android.as_str();
    let firefox = ClientApp::Firefox;
    let segments: Vec<&str> = pathname.trim_start_matches('/').splitn(3, '/').collect();

    match segments.as_slice() {
        [path_lang, app, rest @ ..] if *app == android => {
            format!("/{}/{}/{}", path_lang, firefox, rest.join("/"))
        }
        [app, rest @ ..] if *app == android => format!("/{}/{}/{}", lang, firefox, rest.join("/")),
        _ => format!("/{}/{}/", lang, firefox),
    }
}

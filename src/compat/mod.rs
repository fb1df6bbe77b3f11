// Compatibility module: decides whether an add-on version can run in a given browser

pub mod install;
pub mod location;
pub mod model;
pub mod resolver;
pub mod toolkit_version;
pub mod user_agent;

pub use install::install_url;
pub use location::{Location, PageContext, corrected_location_for_platform};
pub use model::{Addon, ClientApp};
pub use resolver::{
    CompatibilityVerdict, LogDiagnostics, find_install_file, get_client_compatibility,
    is_android_installable, is_quantum_compatible,
};
pub use user_agent::{RegexUserAgentParser, UserAgentInfo, UserAgentParser};

// CLI module for handling command-line interface

use crate::constants;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "amo-compat")]
#[command(about = "Check whether Firefox add-ons can be installed in a given browser")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a settings file with defaults
    Init,

    /// Check an add-on against a browser
    Check {
        /// Slug, guid or numeric id (amo); path (file, xpi)
        id: String,

        /// Where to load the add-on from: amo, file or xpi
        #[arg(long, default_value = constants::DEFAULT_ADDON_SOURCE)]
        source: String,

        /// Client app to check: firefox or android (defaults to the settings file)
        #[arg(long)]
        client_app: Option<String>,

        /// Raw User-Agent header of the browser
        #[arg(long)]
        user_agent: Option<String>,

        /// Value for the install URL's src parameter
        #[arg(long)]
        src: Option<String>,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where a page should redirect for the browser's platform
    Redirect {
        /// Page path, e.g. /en-US/android/addon/some-slug/
        path: String,

        /// Query string to keep, e.g. "?src=featured"
        #[arg(long, default_value = "")]
        search: String,

        /// Client app of the page (defaults to the path's client app segment)
        #[arg(long)]
        client_app: Option<String>,

        /// Locale used for the mobile homepage link
        #[arg(long)]
        lang: Option<String>,

        /// The page is a home page
        #[arg(long)]
        home: bool,

        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Show which page links a paginated listing displays
    Pages {
        /// Total number of pages
        #[arg(long, conflicts_with_all = ["count", "per_page"])]
        page_count: Option<u32>,

        /// Total number of results (with --per-page)
        #[arg(long, requires = "per_page")]
        count: Option<u64>,

        /// Results per page (with --count)
        #[arg(long, requires = "count")]
        per_page: Option<u64>,

        /// Raw page value from the query string
        #[arg(long)]
        current: Option<String>,

        /// How many page links to show (defaults to the settings file)
        #[arg(long)]
        show: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Parse a User-Agent string
    Ua {
        user_agent: String,

        #[arg(long)]
        json: bool,
    },

    /// Download an add-on's install file if it is compatible
    Fetch {
        id: String,

        #[arg(long, default_value = constants::DEFAULT_ADDON_SOURCE)]
        source: String,

        #[arg(long)]
        client_app: Option<String>,

        #[arg(long)]
        user_agent: Option<String>,

        /// Directory to write the file to (defaults to <config dir>/downloads)
        #[arg(long)]
        out: Option<String>,
    },
}

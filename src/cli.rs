//! CLI argument definitions using clap derive macros.

use clap::{ArgGroup, Args, Parser, Subcommand};

use apk_finder_core::BundleType;
use apk_finder_core::resolver::{
    APKMIRROR_DEFAULT_ORIGIN, APKPURE_DEFAULT_BASE_URL, APTOIDE_DEFAULT_API_BASE,
    DEFAULT_VERSIONS_LIMIT,
};

/// Resolve Android package download artifacts from third-party mirror pages.
///
/// Pipe an already-fetched mirror page or API response on stdin; the chosen
/// locator, version list or version code is printed on stdout. The exit code
/// tells calling scripts what happened: 0 found, 1 no match, 2 no table or
/// empty input, 3 parse or input failure.
#[derive(Parser, Debug)]
#[command(name = "apk-finder")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase log verbosity on stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Source adapters and helpers.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pick a variant download page from an APKMirror release page
    Apkmirror(ApkMirrorArgs),
    /// Read versions or a download link from APKPure pages
    Apkpure(ApkPureArgs),
    /// Decode Aptoide API responses or print Aptoide API URLs
    Aptoide(AptoideArgs),
    /// Find the file id for an architecture in an Uptodown file list
    Uptodown(UptodownArgs),
    /// Extract text or attribute values with a CSS selector
    Scrape(ScrapeArgs),
}

#[derive(Args, Debug)]
pub struct ApkMirrorArgs {
    /// Package format listed in the variant table (APK or BUNDLE)
    #[arg(long)]
    pub apk_bundle: BundleType,

    /// Screen density listed in the variant table (e.g. nodpi)
    #[arg(long)]
    pub dpi: String,

    /// Requested architecture, or `all` for universal builds only
    #[arg(long)]
    pub arch: String,

    /// Origin relative variant links are joined to
    #[arg(long, default_value = APKMIRROR_DEFAULT_ORIGIN)]
    pub origin: String,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["latest", "versions", "download"])
))]
pub struct ApkPureArgs {
    /// App name slug on APKPure
    #[arg(long)]
    pub name: String,

    /// Android package name
    #[arg(long)]
    pub package: String,

    /// Print the latest version from a versions page
    #[arg(long)]
    pub latest: bool,

    /// Print every version listed on a versions page
    #[arg(long)]
    pub versions: bool,

    /// Print the download link from a download page
    #[arg(long, requires = "version")]
    pub download: bool,

    /// Version for --download
    #[arg(long)]
    pub version: Option<String>,

    /// Print the page URL to fetch instead of parsing stdin
    #[arg(long)]
    pub url_only: bool,

    /// APKPure site base
    #[arg(long, default_value = APKPURE_DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["latest", "versions", "download", "url", "find_vercode", "parse_meta"])
))]
pub struct AptoideArgs {
    /// Android package name
    #[arg(long)]
    pub package: String,

    /// Device architecture used for the API filter
    #[arg(long, default_value = "universal")]
    pub arch: String,

    /// Print the latest version from a search response
    #[arg(long)]
    pub latest: bool,

    /// Print every version from a list-versions response
    #[arg(long)]
    pub versions: bool,

    /// Print the download path (search response for `latest`, metadata response otherwise)
    #[arg(long, requires = "version")]
    pub download: bool,

    /// Print the API URL to fetch instead of parsing stdin
    #[arg(long)]
    pub url: bool,

    /// Print the version code for --version from a list-versions response
    #[arg(long, requires = "version")]
    pub find_vercode: bool,

    /// Print the download path from a metadata response
    #[arg(long)]
    pub parse_meta: bool,

    /// Version name, or `latest`
    #[arg(long)]
    pub version: Option<String>,

    /// Version code for a metadata URL (with --url)
    #[arg(long)]
    pub vercode: Option<i64>,

    /// Page size for the list-versions URL
    #[arg(
        long,
        default_value_t = DEFAULT_VERSIONS_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..=500)
    )]
    pub limit: u32,

    /// Aptoide API base
    #[arg(long, default_value = APTOIDE_DEFAULT_API_BASE)]
    pub api_base: String,
}

/// The one action an `aptoide` invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AptoideAction {
    Latest,
    Versions,
    Download,
    Url,
    FindVercode,
    ParseMeta,
}

impl AptoideArgs {
    /// Returns the selected action; the `action` group guarantees exactly one is set.
    pub fn action(&self) -> AptoideAction {
        let selected = [
            (self.latest, AptoideAction::Latest),
            (self.versions, AptoideAction::Versions),
            (self.download, AptoideAction::Download),
            (self.url, AptoideAction::Url),
            (self.find_vercode, AptoideAction::FindVercode),
            (self.parse_meta, AptoideAction::ParseMeta),
        ];
        selected
            .into_iter()
            .find_map(|(set, action)| set.then_some(action))
            .unwrap_or(AptoideAction::Url)
    }
}

#[derive(Args, Debug)]
pub struct UptodownArgs {
    /// Allowed architecture labels, e.g. `arm64-v8a armeabi-v7a`
    #[arg(required = true, num_args = 1..)]
    pub archs: Vec<String>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").required(true).args(["text", "attribute"])))]
pub struct ScrapeArgs {
    /// CSS selector to match elements
    pub selector: String,

    /// Print the text content of each match
    #[arg(long)]
    pub text: bool,

    /// Print this attribute of each match
    #[arg(long, value_name = "ATTR")]
    pub attribute: Option<String>,
}

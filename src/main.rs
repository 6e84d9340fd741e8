use bower_changelog::config::EnvSettings;
use bower_changelog::{
    build_changelog, publish, ChangelogRequest, ConfluenceClient, DocumentStore, GitCli,
    PublishOptions, Result,
};
use std::io::stdout;
use std::path::{Path, PathBuf};
use structopt::StructOpt;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "bower-changelog",
    about = "Builds a changelog of the dependencies that changed between two revisions"
)]
pub struct CliArgs {
    /// Base revision, defaults to the tag created before --r2
    #[structopt(long = "r1")]
    r1: Option<String>,

    /// Target revision, defaults to the latest tag
    #[structopt(long = "r2")]
    r2: Option<String>,

    /// List every dependency, not only the organisation's modules
    #[structopt(long = "all")]
    all: bool,

    /// Do not write, commit and push the changelog file
    #[structopt(long = "nopush")]
    nopush: bool,

    /// Do not publish to Confluence
    #[structopt(long = "nopublish")]
    nopublish: bool,

    #[structopt(long = "confluence-page-id")]
    confluence_page_id: Option<String>,

    #[structopt(long = "repo", parse(from_os_str), default_value = ".")]
    repo: PathBuf,

    #[structopt(long = "manifest", default_value = "bower.json")]
    manifest: String,

    #[structopt(long = "section", default_value = "dependencies")]
    section: String,

    /// Where dependency checkouts are made, defaults to the system temp dir
    #[structopt(long = "scratch-dir", parse(from_os_str))]
    scratch_dir: Option<PathBuf>,

    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::fs::canonicalize(path)?)
}

fn run(args: CliArgs) -> Result<()> {
    let env = EnvSettings::from_env();
    let repo = absolute(&args.repo)?;
    let scratch_dir = absolute(&args.scratch_dir.unwrap_or_else(std::env::temp_dir))?;
    let git = GitCli::new(&repo);

    let request = ChangelogRequest {
        from: args.r1,
        to: args.r2,
        manifest_path: args.manifest,
        section: args.section,
        filter: env.dependency_filter(args.all),
        scratch_dir,
    };
    let report = build_changelog(&git, &request)?;
    report.write_table(&mut stdout().lock())?;

    let store = env.confluence.map(ConfluenceClient::new);
    let options = PublishOptions {
        file: !args.nopush,
        remote: !args.nopublish,
        page_id: args.confluence_page_id.or(env.page_id),
    };
    publish(
        &git,
        &repo,
        store.as_ref().map(|s| s as &dyn DocumentStore),
        &options,
        &report,
    );
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    let args = CliArgs::from_args();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

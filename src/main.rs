use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use jar_harvester::harvest::{LibraryHarvester, ListPolicy};
use jar_harvester::{logging, Exclusion, Flavor, SdkLayout};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["dir", "sdk_home", "from_env"])))]
struct Cli {
    /// Directory whose archives are harvested
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// SDK installation root; harvests its lib/ directory
    #[arg(long, value_name = "PATH")]
    sdk_home: Option<PathBuf>,

    /// Read the SDK root and flavor from JAR_HARVESTER_SDK_HOME / JAR_HARVESTER_FLAVOR
    #[arg(long)]
    from_env: bool,

    /// Installation flavor used with --sdk-home or --dir
    #[arg(long, default_value = "community", conflicts_with = "from_env")]
    flavor: Flavor,

    /// Organization tag for every declaration (defaults to sdk.<flavor>)
    #[arg(long)]
    org: Option<String>,

    /// Name of the emitted dependency group
    #[arg(long, default_value = "libs")]
    name: String,

    /// Archive to leave out (repeatable)
    #[arg(long, value_name = "FILE", conflicts_with = "allow")]
    deny: Vec<String>,

    /// Archive to include; only these are harvested (repeatable)
    #[arg(long, value_name = "FILE")]
    allow: Vec<String>,

    /// Coordinate excluded from every declaration, as org:name (repeatable)
    #[arg(long, value_name = "ORG:NAME")]
    exclude: Vec<Exclusion>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let layout = if cli.from_env {
        Some(SdkLayout::from_env()?)
    } else {
        cli.sdk_home
            .as_ref()
            .map(|home| SdkLayout::new(home, cli.flavor))
    };

    let dir = match (&cli.dir, &layout) {
        (Some(dir), _) => dir.clone(),
        (None, Some(layout)) => layout.lib_dir(),
        (None, None) => bail!("one of --dir, --sdk-home or --from-env is required"),
    };

    let organization = match (cli.org, &layout) {
        (Some(org), _) => org,
        (None, Some(layout)) => layout.default_organization(),
        (None, None) => cli.flavor.default_organization(),
    };

    let policy = if cli.allow.is_empty() {
        ListPolicy::Deny(cli.deny)
    } else {
        ListPolicy::Allow(cli.allow)
    };

    let harvester = LibraryHarvester::new(organization).with_exclusions(cli.exclude);
    let result = harvester
        .harvest(&cli.name, &dir, &policy)
        .with_context(|| format!("failed to harvest '{}'", dir.display()))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result.group)?
    } else {
        serde_json::to_string(&result.group)?
    };
    println!("{}", json);

    Ok(())
}

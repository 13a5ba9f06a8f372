use std::error::Error;

use clap::Parser;
use eia930::{
    config::{load_env_file, Config},
    db::{
        eia::data_set::{DataSet, FetchWindow},
        prod_db::ProdDb,
    },
    scrape::run,
};
use log::info;

#[derive(Parser, Debug)]
#[command(version, about = "Scrape hourly EIA-930 data into MongoDB", long_about = None)]
struct Args {
    /// Balancing authority to scrape for, e.g. PJM
    #[arg(short, long)]
    balancing_authority: String,

    /// Earliest hour to pull, e.g. 2022-12-13T00
    #[arg(short, long)]
    from_time: String,

    /// Latest hour to pull, e.g. 2022-12-13T24
    #[arg(short, long)]
    to_time: Option<String>,

    /// Which data set to retrieve. Allowed: generation, interchange
    #[arg(short, long, default_value = "generation")]
    data_set: String,

    /// Environment name, e.g., test, prod.  Loads .env/{env}.env
    #[arg(short, long)]
    env: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let data_set: DataSet = args.data_set.parse()?;
    load_env_file(args.env.as_deref())?;
    let config = Config::from_env()?;
    let window = FetchWindow::new(
        &args.balancing_authority,
        &args.from_time,
        args.to_time.as_deref(),
    );

    let client = ProdDb::eia_client(&config)?;
    let mut store = ProdDb::eia_raw_data(&config).await?;
    info!(
        "scraping {} for {} starting {}",
        data_set, window.balancing_authority, window.start
    );

    let summary = run(data_set, &window, &client, &mut store).await?;
    println!("{}", summary);

    Ok(())
}

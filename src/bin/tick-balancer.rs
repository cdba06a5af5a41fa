use tick_balancer::config;
use tick_balancer::driver;
use tick_balancer::error::Result;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TICK_BALANCER_LOG";

fn main() {
    init_logging();
    if let Err(err) = run() {
        match err.return_code() {
            Some(rc) => eprintln!("Error: {} (rc={})", err, rc),
            None => eprintln!("Error: {}", err),
        }
        std::process::exit(err.exit_code());
    }
}

fn run() -> Result<()> {
    let args = config::parse_args()?;
    let Some(settings) = config::build_config(args)? else {
        println!("{}", config::USAGE);
        return Ok(());
    };

    driver::load_balance(&settings)?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

use clap::Parser;
use client::{Account, HeaderFeed, TxAuthorization};
use confirmation::{ConfirmationWaiter, ProviderWatcher};
use runner::{
    config::{Cli, Config},
    Scenario,
};
use token::{read_metadata, Erc20Proxy};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing .env file is fine, the variables may come from the shell.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting token runner");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            info!("Loading config: {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    let network = config.network_config();
    let token_address = config.token_address()?;
    let settings = config.scenario_settings()?;
    let timeout = config.confirmation_timeout();

    info!("Loaded config:");
    info!("  Network: {:?}", config.network);
    info!("  Token: {}", token_address);
    info!("  Gas limit: {}", config.gas_limit);
    info!("  Confirmation timeout: {:?}", timeout);

    let feed = HeaderFeed::for_url(&cli.rpc_url)?;
    let provider = client::connect(&cli.rpc_url).await?;
    let chain = client::fetch_chain_info(&provider).await?;
    info!(chain_id = chain.chain_id, gas_price = chain.gas_price, ?feed, "Connected");

    if chain.chain_id != network.chain_id {
        warn!(
            expected = network.chain_id,
            actual = chain.chain_id,
            "Node chain id does not match the configured network"
        );
    }

    let authorization =
        TxAuthorization::new(chain.chain_id, chain.gas_price).with_gas_limit(config.gas_limit);
    let deployer = Account::derive(&cli.deployer_key, authorization)?;
    let user = Account::derive(&cli.user_key, authorization)?;
    info!(deployer = %deployer.address(), user = %user.address(), "Derived accounts");

    let wallet_provider = client::connect_with_accounts(&cli.rpc_url, &[&deployer, &user]).await?;

    let token = Erc20Proxy::new(wallet_provider.clone(), token_address);
    let metadata = read_metadata(&token).await?;
    info!(
        name = %metadata.name,
        symbol = %metadata.symbol,
        decimals = metadata.decimals,
        total_supply = %amount::format_units(metadata.total_supply, metadata.decimals),
        "Loaded token"
    );

    let waiter =
        ConfirmationWaiter::new(ProviderWatcher::new(wallet_provider, feed)).with_timeout(timeout);

    let report = Scenario::new(&token, &waiter, &deployer, &user, settings)
        .run()
        .await?;

    for handle in &report.transactions {
        for event in token.receipt_events(handle.tx_hash).await? {
            info!(tx_hash = %handle.tx_hash, ?event, "Token event");
        }
    }

    info!("Scenario completed");
    Ok(())
}

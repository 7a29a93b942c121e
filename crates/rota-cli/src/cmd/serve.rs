use anyhow::Result;
use rota_core::config::Config;

pub fn run(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(rota_server::serve(config))
}

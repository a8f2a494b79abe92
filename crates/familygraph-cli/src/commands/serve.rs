//! HTTP API server command

use clap::Args;

use crate::AppContext;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (default from config)
    #[arg(short, long)]
    pub addr: Option<String>,

    /// Bearer token required on /api routes
    #[arg(long, env = "FAMILYGRAPH_TOKEN")]
    pub token: Option<String>,
}

pub async fn run(args: &ServeArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let addr = args.addr.as_deref().unwrap_or(&ctx.config.http_addr);
    let token = args.token.clone().or_else(|| ctx.config.http_token.clone());

    tracing::info!(
        "Starting API server with {} inference",
        ctx.engine.config().inference_mode.as_str()
    );
    familygraph_http::serve(ctx.engine.clone(), addr, token).await
}

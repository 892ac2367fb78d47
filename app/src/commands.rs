use crate::prompt::Prompt;
use crate::runner;
use crate::server;
use crate::state::AppState;
use placescout_core::{AppConfig, SearchQuery};
use placescout_store::ResultStore;
use std::io;

pub(crate) async fn scrape(config: &AppConfig, query: Option<String>, yes: bool) -> anyhow::Result<()> {
    let search_url_template = &config.discovery.search_url_template;

    let query = {
        let mut prompt = Prompt::new(io::stdin().lock(), io::stdout());
        let query = match query {
            Some(raw) => SearchQuery::new(raw)?,
            None => prompt.ask_query()?,
        };

        prompt.show_plan(&query, &query.search_url(search_url_template))?;
        if !yes && !prompt.confirm("Is this correct?")? {
            println!("Search cancelled. Please try again.");
            return Ok(());
        }
        query
    };

    let store = ResultStore::new(config.output.dir.clone());
    let batch = runner::scrape(config, &store, &query).await?;

    println!(
        "\nComplete data saved for {} results ({} succeeded, {} failed) in {}",
        batch.total_count,
        batch.success_count,
        batch.error_count,
        store.final_path(query.formatted()).display()
    );
    Ok(())
}

pub(crate) async fn serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    server::serve(AppState::new(config), &format!("{host}:{port}")).await
}

pub(crate) async fn files(config: &AppConfig) -> anyhow::Result<()> {
    let store = ResultStore::new(config.output.dir.clone());
    let files = store.list_results().await?;

    if files.is_empty() {
        println!("No result files in {}", store.dir().display());
        return Ok(());
    }

    for file in files {
        println!(
            "{:<48} {:>10} bytes  {}",
            file.name,
            file.size,
            file.modified.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use shelfwise_catalog::{BookRecord, SummaryCatalog, SummaryTool, load_records, record_id};
use shelfwise_retrieval::{RetrievalConfig, Retriever};
use shelfwise_vector_store::{IndexBuildInfo, IndexEntry, TITLE_KEY, VectorStore};
use tracing::info;

use crate::display::{header, rule, snippet};

/// Records shown after a build.
const BUILD_PREVIEW: usize = 5;

fn print_config(config: &RetrievalConfig) {
    println!("Index path: {}", config.index.path.display());
    println!("Collection name: {}", config.index.collection);
    println!("Embedding provider: {:?}", config.embedding.provider);
    println!("Embedding model: {}", config.embedding.model);
    println!("Top_k: {}", config.query.top_k);
    rule();
}

pub async fn build_index(config: &RetrievalConfig, records_path: &Path) -> Result<()> {
    header("Build Index");
    print_config(config);

    let records = load_records(records_path)
        .await
        .with_context(|| format!("loading records from {}", records_path.display()))?;
    println!("Loaded {} records from dataset.", records.len());

    let client = config.embedding.build_client()?;
    let ids: Vec<String> = (0..records.len()).map(record_id).collect();
    let documents: Vec<String> = records.iter().map(|r| r.summary.clone()).collect();
    let metadatas = records.iter().map(BookRecord::metadata).collect();

    println!(
        "Embedding {} summaries with model '{}'...",
        documents.len(),
        client.model()
    );
    let vectors = client
        .embed_texts(&documents)
        .await
        .context("embedding summaries")?;
    let Some(dimension) = vectors.first().map(Vec::len) else {
        bail!("provider returned no embeddings");
    };
    println!("Embeddings done.");

    let store = VectorStore::new(&config.index.path);
    let build_info = IndexBuildInfo::new(client.model(), dimension);
    println!(
        "Recreating collection '{}' at {}",
        config.index.collection,
        config.index.path.display()
    );
    let mut collection = store
        .recreate_collection(&config.index.collection, build_info)
        .await?;

    let entries = IndexEntry::from_columns(ids, vectors, documents, metadatas)?;
    collection.add(entries)?;
    store.save_collection(&collection).await?;

    let reopened = store.open_collection(&config.index.collection).await?;
    println!("Indexed items: {}", reopened.count());
    println!("Sample titles:");
    for entry in reopened.entries().take(BUILD_PREVIEW) {
        let title = entry.metadata.get(TITLE_KEY).map_or("", String::as_str);
        println!("  - {title}  (id={})", entry.id);
    }

    info!("Build complete");
    println!("=== Build complete ===");
    Ok(())
}

pub async fn inspect(
    config: &RetrievalConfig,
    show: usize,
    k: Option<usize>,
    queries: &[String],
) -> Result<()> {
    header("Inspect Index");
    print_config(config);

    let store = VectorStore::new(&config.index.path);
    let collection = store
        .open_collection(&config.index.collection)
        .await
        .context("opening collection (run build-index first)")?;

    println!("Indexed items: {}", collection.count());
    if collection.is_empty() {
        println!("No items found.");
    } else if show > 0 {
        println!("\nSample titles:");
        for (i, entry) in collection.entries().take(show).enumerate() {
            let title = entry.metadata.get(TITLE_KEY).map_or("", String::as_str);
            println!("  {:>2}. {title}  (id={})", i + 1, entry.id);
        }
        println!();
    }

    if queries.is_empty() {
        return Ok(());
    }

    let retriever = Retriever::builder()
        .client(config.embedding.build_client()?)
        .index(Arc::new(collection))
        .config(config.query)
        .build()?;
    let k = k.unwrap_or(config.query.top_k);
    println!(
        "Index model: {}  Query model: {}\n",
        retriever.index().build_info().embed_model,
        retriever.query_model()
    );

    for query in queries {
        println!("Query: '{query}'  (top {k})");
        match retriever.search(query, Some(k)).await {
            Ok(result) if result.hits.is_empty() => println!("No results found"),
            Ok(result) => {
                for (i, hit) in result.hits.iter().enumerate() {
                    println!(
                        "{:>2}. {} [distance={:.4}]",
                        i + 1,
                        hit.title(),
                        hit.distance()
                    );
                    let snippet = snippet(hit.summary());
                    if !snippet.is_empty() {
                        println!("{snippet}...");
                    }
                }
            }
            Err(e) => println!("Error running query: {e}"),
        }
        println!();
    }

    Ok(())
}

pub async fn summary(
    config: &RetrievalConfig,
    title: &str,
    records_path: Option<&Path>,
) -> Result<()> {
    let catalog = match records_path {
        Some(path) => SummaryCatalog::from_records(&load_records(path).await?),
        None => {
            let store = VectorStore::new(&config.index.path);
            let collection = store
                .open_collection(&config.index.collection)
                .await
                .context("opening collection (run build-index first or pass --records)")?;
            SummaryCatalog::from_collection(&collection)
        }
    };

    let tool = SummaryTool::new(catalog);
    info!("Looking up {title:?} among {} titles", tool.catalog().len());
    println!("{}", tool.get_summary_by_title(title));
    Ok(())
}

pub fn tools() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&SummaryTool::schemas())?);
    Ok(())
}

#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use courseline_tool::http_api::{self, Planner};
    use courseline_tool::{CsvScheduleStore, CurriculumCatalog, ScheduleStore};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "courseline_tool=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("COURSELINE_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let planner = match std::env::var("COURSELINE_TOOL_DATA_DIR") {
        Ok(dir) => {
            let store = CsvScheduleStore::new(&dir);
            let rows = store.load_course_lines()?;
            let catalog = CurriculumCatalog::from_rows(&store.load_curriculum()?);
            println!(
                "Loaded {} course line rows and {} curricula from {dir}",
                rows.len(),
                catalog.len()
            );
            Planner::new(rows, catalog)
        }
        Err(_) => Planner::new(Vec::new(), CurriculumCatalog::new()),
    };

    println!("courseline-tool HTTP API listening on http://{addr}");
    http_api::serve(addr, planner).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}

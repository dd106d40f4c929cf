use ollamakit::api::{build_client, ChatRequest};
use ollamakit::core::kernel::Transport;
use ollamakit::core::config::ConfigError;
use ollamakit::{ClientConfig, Inference, Message, ModelCatalog, Reachability, Route};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match ClientConfig::from_env("OLLAMA") {
        Ok(config) => config,
        Err(ConfigError::MissingEnvironmentVariable(_)) => ClientConfig::default(),
        Err(e) => return Err(e.into()),
    };
    let client = build_client(config)?;

    let chat = ChatRequest::new(
        "llama3",
        vec![
            Message::system("Answer in one sentence."),
            Message::user("Why is the sky blue?"),
        ],
        None,
        None,
    );
    println!(
        "Signed chat request: nonce={} timestamp={} signature={}",
        chat.nonce(),
        chat.timestamp(),
        chat.signature()
    );

    let request = client.request(&Route::Chat(chat.clone()))?;
    println!("{} {}", request.method, request.url);

    if !client.reachable().await {
        println!("Server at {} is not reachable", client.base_url());
        return Ok(());
    }

    match client.models().await {
        Ok(models) => {
            println!("Found {} models", models.models.len());
            for model in models.models.iter().take(5) {
                println!("Model: {} ({} bytes)", model.name, model.size);
            }
        }
        Err(e) => println!("Error listing models: {}", e),
    }

    match client.chat(chat).await {
        Ok(chunks) => {
            let reply: String = chunks
                .iter()
                .filter_map(|chunk| chunk.message.as_ref())
                .map(|message| message.content.as_str())
                .collect();
            println!("Reply: {}", reply);
        }
        Err(e) => println!("Error sending chat: {}", e),
    }

    // Raw access through the transport, bypassing the typed facade
    let raw = client.transport().send(client.request(&Route::Root)?).await?;
    println!("Root says: {}", String::from_utf8_lossy(&raw));

    Ok(())
}

use clap::Parser;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use taikopresence::{LogEvents, PresenceBuilder, PresenceConfig, PresenceSession};

/// Cycle a rhythm-game presence through a few screens
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Discord Application Client ID
    #[arg(short, long)]
    client_id: Option<String>,

    /// Client version shown in the large icon tooltip
    #[arg(long, default_value = "1.5.8")]
    game_version: String,

    /// Seconds to stay on each screen
    #[arg(long, default_value_t = 8)]
    seconds: u64,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (optional)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let client_id = args
        .client_id
        .or_else(|| std::env::var("DISCORD_CLIENT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: DISCORD_CLIENT_ID is required!");
            eprintln!("Provide it via:");
            eprintln!("  - Command line: cargo run --features native --example game_status -- --client-id YOUR_ID");
            eprintln!("  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --features native --example game_status");
            std::process::exit(1);
        });

    let mut session = PresenceSession::native(
        &client_id,
        PresenceConfig::for_version(&args.game_version),
        Arc::new(LogEvents),
    )?;

    let screens = [
        ("Title screen", "", None),
        ("Song select", "Pops", None),
        ("Playing: Yoru ni Kakeru", "Oni ★8", Some(("auto", "Auto play"))),
        ("Result", "Full combo!", None),
    ];

    for (details, state, small_icon) in screens {
        println!("\n Screen: {}", details);

        let mut builder = PresenceBuilder::new()
            .details(details)
            .state(state)
            .start_timestamp_now()?;
        if let Some((key, text)) = small_icon {
            builder = builder.small_image(key).small_text(text);
        }
        session.update_presence(&builder.build())?;

        // Keep polling so ready/disconnect/error reports reach the log
        let until = Instant::now() + Duration::from_secs(args.seconds);
        while Instant::now() < until {
            session.run_callbacks()?;
            thread::sleep(Duration::from_millis(100));
        }
    }

    println!("\n Clearing presence...");
    session.clear_presence()?;
    session.shutdown();

    Ok(())
}

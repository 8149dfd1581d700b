use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shamba_scout::ai::{self, AiGuide, ImageAttachment, SuitabilityRanker};
use shamba_scout::app::{AppState, GuideSession, LandFilter, LandSearch, OnboardingEvent, UserRole};
use shamba_scout::models::{Listing, Sender, UserProfile};
use shamba_scout::storage::{FileStore, Preferences};
use shamba_scout::{fixtures, Config};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shamba-scout", version, about = "Farmland rental and produce marketplace")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show marketplace listings
    Listings {
        #[arg(long)]
        land: bool,
        #[arg(long)]
        products: bool,
    },
    /// Ask the AI farming guide a question
    Guide {
        prompt: String,
        /// Photo of a plant to diagnose
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Rank land listings for a farming purpose
    Rank {
        query: String,
        #[arg(long)]
        soil: Option<String>,
        #[arg(long)]
        water: Option<bool>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Show or change saved listings
    Wishlist {
        /// Listing id to save or unsave
        #[arg(long)]
        toggle: Option<u32>,
    },
    /// Complete onboarding in one go
    Onboard {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        district: String,
        #[arg(long)]
        photo: PathBuf,
    },
    /// Show the inbox, or open one conversation
    Messages {
        /// Conversation id to open
        #[arg(long)]
        open: Option<u32>,
        /// Message to send in the opened conversation
        #[arg(long, requires = "open")]
        send: Option<String>,
    },
    /// Show the stored profile
    Profile,
    /// Switch between light and dark theme
    Theme,
    /// Clear all local data
    Logout,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Owner,
    Farmer,
    Trader,
    Investor,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Owner => UserRole::LandOwner,
            RoleArg::Farmer => UserRole::Farmer,
            RoleArg::Trader => UserRole::Trader,
            RoleArg::Investor => UserRole::Investor,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so guide replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let store = FileStore::open(&config.store_path)
        .with_context(|| format!("Failed to open store at {}", config.store_path.display()))?;
    let mut state = AppState::load(Preferences::new(store));

    match cli.command {
        Command::Listings { land, products } => {
            let listings = match (land, products) {
                (true, false) => fixtures::land_listings(),
                (false, true) => fixtures::product_listings(),
                _ => fixtures::all_listings(),
            };
            for (i, listing) in listings.iter().enumerate() {
                print_listing(i + 1, listing, state.wishlist().contains(listing.id));
            }
        }
        Command::Guide { prompt, image } => {
            let image = image
                .as_deref()
                .map(ImageAttachment::from_path)
                .transpose()?;
            let guide = AiGuide::new(ai::backend_from_config(&config));
            run_guide(&guide, &prompt, image).await?;
        }
        Command::Rank {
            query,
            soil,
            water,
            location,
        } => {
            let ranker = SuitabilityRanker::new(ai::backend_from_config(&config));
            let mut search = LandSearch::new(fixtures::land_listings());
            search.set_filter(LandFilter {
                soil_type: soil,
                water_source: water,
                location,
            });
            search.set_query(query);

            info!("🌱 Analyzing {} plots...", search.visible().len());
            search.analyze(&ranker).await;

            if let Some(notice) = search.notice() {
                println!("⚠️  {}", notice);
            }
            match search.enriched() {
                Some(ranked) if ranked.is_empty() => println!("No suitable land found."),
                Some(ranked) => {
                    for (i, item) in ranked.iter().enumerate() {
                        let saved = state.wishlist().contains(item.listing.id);
                        print_listing(i + 1, &item.listing, saved);
                        println!("   Suitability: {}/100 - {}", item.score, item.reason);
                        println!();
                    }
                }
                None => {}
            }
        }
        Command::Wishlist { toggle } => {
            if let Some(id) = toggle {
                let listing = fixtures::find_listing(id)
                    .with_context(|| format!("No listing with id {id}"))?;
                let saved = state.toggle_wishlist(id)?;
                info!(
                    "{} {}",
                    if saved { "💚 Saved" } else { "🗑️  Removed" },
                    listing.title
                );
            }
            let saved = state.wishlisted_listings();
            if saved.is_empty() {
                println!("Your wishlist is empty.");
            }
            for (i, listing) in saved.iter().enumerate() {
                print_listing(i + 1, listing, true);
            }
        }
        Command::Onboard {
            role,
            phone,
            name,
            district,
            photo,
        } => {
            let photo = ImageAttachment::from_path(&photo)?.data_url();
            state.advance(OnboardingEvent::Started)?;
            state.advance(OnboardingEvent::RoleSelected(role.into()))?;
            state.advance(OnboardingEvent::OtpRequested { phone })?;
            state.advance(OnboardingEvent::OtpVerified)?;
            state.advance(OnboardingEvent::ProfileCompleted(UserProfile {
                name,
                photo,
                district,
            }))?;
            info!("✅ Welcome, {}!", state.profile().name);
        }
        Command::Messages { open, send } => match open {
            None => {
                for convo in fixtures::conversations() {
                    let unread = match convo.unread_count {
                        Some(n) if n > 0 => format!(" ({n} unread)"),
                        _ => String::new(),
                    };
                    println!("{}. {}{} · {}", convo.id, convo.user_name, unread, convo.timestamp);
                    println!("   Re: {}", convo.listing_title);
                    println!("   {}", convo.last_message);
                }
            }
            Some(id) => {
                let chat = state
                    .open_conversation(id)
                    .with_context(|| format!("No conversation with id {id}"))?;
                if let Some(text) = send {
                    chat.send(&text);
                }
                let details = chat.details();
                println!("💬 {} · about {}", details.user_name, details.listing_title);
                for msg in chat.messages() {
                    let who = match msg.sender {
                        Sender::Me => "You",
                        Sender::Other => chat.details().user_name.as_str(),
                    };
                    println!("[{}] {}: {}", msg.timestamp, who, msg.text);
                }
            }
        },
        Command::Profile => {
            let profile = state.profile();
            if profile.name.is_empty() {
                println!("Not onboarded yet.");
            } else {
                println!("{} ({})", profile.name, profile.district);
                println!("Theme: {}", state.theme().as_str());
                println!("Saved listings: {}", state.wishlist().len());
            }
        }
        Command::Theme => {
            let theme = state.toggle_theme()?;
            println!("Theme: {}", theme.as_str());
        }
        Command::Logout => {
            state.logout()?;
            info!("👋 Local data cleared");
        }
    }

    Ok(())
}

async fn run_guide(guide: &AiGuide, prompt: &str, image: Option<ImageAttachment>) -> Result<()> {
    let mut session = GuideSession::new();
    let Some(mut stream) = session.submit(guide, prompt, image) else {
        anyhow::bail!("Ask a question or attach a photo");
    };

    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next_fragment().await {
        session.receive(&fragment);
        print!("{}", fragment);
        stdout.flush()?;
    }
    session.finish();
    println!();
    Ok(())
}

fn print_listing(index: usize, listing: &Listing, saved: bool) {
    println!(
        "{}. {} ({}){}",
        index,
        listing.title,
        listing.price,
        if saved { " 💚" } else { "" }
    );
    println!("   {} · {}", listing.location, listing.seller);
    if let Some(size) = &listing.size {
        println!("   Size: {}", size);
    }
    if let Some(soil) = &listing.soil_type {
        let water = match listing.water_source {
            Some(true) => "water on site",
            _ => "no water source",
        };
        println!(
            "   Soil: {}, {}, {}",
            soil,
            listing.land_use.as_deref().unwrap_or("unspecified use"),
            water
        );
    }
    println!("   ID: {}", listing.id);
}

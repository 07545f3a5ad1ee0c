//! acudp - Racing-simulation server UDP plugin
//!
//! Listens for server notifications and sends administrative commands.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use acudp::config::{self, Config};
use acudp::network::{Dispatcher, PacketHandler, PluginClient};
use acudp::protocol::{
    self, CodecError, Command, Packet, PacketStream, SessionSettings, CURRENT_SESSION,
};

/// acudp - UDP plugin for the racing-simulation server
#[derive(Parser)]
#[command(name = "acudp")]
#[command(author = "acudp Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Decode server notifications and send plugin commands", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Server host receiving commands
    #[arg(long, global = true)]
    server: Option<String>,

    /// Server port receiving commands
    #[arg(long, global = true)]
    server_port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for notifications from the server
    Listen {
        /// Local port the server sends to
        #[arg(short, long)]
        port: Option<u16>,

        /// Realtime update interval in ms (0 = off)
        #[arg(long)]
        realtime_ms: Option<u16>,

        /// Print one JSON object per packet
        #[arg(long)]
        json: bool,
    },

    /// Decode a capture file of back-to-back packets
    Replay {
        /// Capture file
        file: PathBuf,

        /// Print one JSON object per packet
        #[arg(long)]
        json: bool,
    },

    /// Send a single command to the server
    Send {
        #[command(subcommand)]
        command: SendCommand,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SendCommand {
    /// Set the realtime car update interval
    Realtime { interval_ms: u16 },
    /// Request car info for a car
    CarInfo { car_id: u8 },
    /// Chat to a single car
    Chat { car_id: u8, message: String },
    /// Chat to everybody
    Broadcast { message: String },
    /// Request session info
    SessionInfo {
        /// Session index, -1 for the current session
        #[arg(long, default_value_t = CURRENT_SESSION, allow_negative_numbers = true)]
        index: i16,
    },
    /// Change a session's settings
    SetSession {
        index: u8,
        name: String,
        #[arg(long = "type")]
        session_type: u8,
        #[arg(long, default_value_t = 0)]
        laps: u32,
        #[arg(long, default_value_t = 0)]
        time: u32,
        #[arg(long, default_value_t = 0)]
        wait: u32,
    },
    /// Kick a car's driver
    Kick { car_id: u8 },
    /// Move on to the next session
    NextSession,
    /// Restart the current session
    RestartSession,
    /// Run an admin command, e.g. "/ballast 3 20"
    Admin { command: String },
}

impl From<SendCommand> for Command {
    fn from(command: SendCommand) -> Self {
        match command {
            SendCommand::Realtime { interval_ms } => Command::RealtimePosInterval { interval_ms },
            SendCommand::CarInfo { car_id } => Command::GetCarInfo { car_id },
            SendCommand::Chat { car_id, message } => Command::SendChat { car_id, message },
            SendCommand::Broadcast { message } => Command::BroadcastChat { message },
            SendCommand::SessionInfo { index } => Command::GetSessionInfo {
                session_index: index,
            },
            SendCommand::SetSession {
                index,
                name,
                session_type,
                laps,
                time,
                wait,
            } => Command::SetSessionInfo(SessionSettings {
                session_index: index,
                name,
                session_type,
                laps,
                time_seconds: time,
                wait_seconds: wait,
            }),
            SendCommand::Kick { car_id } => Command::KickUser { car_id },
            SendCommand::NextSession => Command::NextSession,
            SendCommand::RestartSession => Command::RestartSession,
            SendCommand::Admin { command } => Command::AdminCommand { command },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Initialize logging
    let filter = if cli.verbose || config.general.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Some(server) = cli.server {
        config.network.server_host = server;
    }
    if let Some(port) = cli.server_port {
        config.network.server_port = port;
    }

    match cli.command {
        Commands::Listen {
            port,
            realtime_ms,
            json,
        } => {
            if let Some(port) = port {
                config.network.local_port = port;
            }
            if let Some(interval) = realtime_ms {
                config.listen.realtime_interval_ms = interval;
            }
            config.general.json |= json;
            run_listen(config).await?;
        }
        Commands::Replay { file, json } => {
            run_replay(&file, json || config.general.json)?;
        }
        Commands::Send { command } => {
            // Commands go out from an ephemeral port so a running listener
            // keeps its own
            config.network.local_port = 0;
            let client = PluginClient::bind(&config.network).await?;
            client.send(&command.into()).await?;
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Listen for notifications until Ctrl+C
async fn run_listen(config: Config) -> anyhow::Result<()> {
    let mut client = PluginClient::bind(&config.network).await?;

    let mut dispatcher = Dispatcher::new();
    dispatcher.subscribe(Box::new(Printer {
        json: config.general.json,
    }));

    if config.listen.request_session_info {
        client.get_session_info(CURRENT_SESSION).await?;
    }
    if config.listen.realtime_interval_ms > 0 {
        client
            .enable_realtime_report(config.listen.realtime_interval_ms)
            .await?;
    }

    tracing::info!("Listening for server notifications, Ctrl+C to stop");

    loop {
        tokio::select! {
            result = client.next_packet() => {
                let packet = result?;
                dispatcher.dispatch(&packet);

                // Sent from here rather than a handler so replies stay in
                // receive order
                if let Packet::NewConnection(event) = &packet {
                    if config.listen.request_car_info {
                        client.get_car_info(event.car_id).await?;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Decode every packet in a capture file
fn run_replay(path: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let mut dispatcher = Dispatcher::new();
    dispatcher.subscribe(Box::new(Printer { json }));
    let mut stream = PacketStream::new(&data);
    let mut count = 0usize;

    while let Some(result) = stream.next() {
        match result {
            Ok(packet) => {
                dispatcher.dispatch(&packet);
                count += 1;
            }
            // A capture cut mid-packet simply ends the replay
            Err(CodecError::TruncatedBuffer { .. }) => {
                tracing::warn!("Capture ends with a partial packet at byte {}", stream.offset());
            }
            Err(e) => {
                anyhow::bail!("Decode failed at byte {}: {}", stream.offset(), e);
            }
        }
    }

    tracing::info!("Replayed {} packets from {}", count, path.display());
    Ok(())
}

/// Presents every packet on stdout or in the log
struct Printer {
    json: bool,
}

impl PacketHandler for Printer {
    fn on_packet(&mut self, packet: &Packet) {
        if self.json {
            match serde_json::to_string(packet) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("Could not serialize {}: {}", packet.name(), e),
            }
        } else {
            tracing::info!("{} {}", packet.name(), summarize(packet));
        }
    }

    fn on_version(&mut self, protocol_version: u8) {
        if protocol_version != protocol::PROTOCOL_VERSION {
            tracing::warn!(
                "Server speaks protocol {}, expected {}",
                protocol_version,
                protocol::PROTOCOL_VERSION
            );
        }
    }
}

/// One-line human readable description of a packet
fn summarize(packet: &Packet) -> String {
    match packet {
        Packet::NewSession(info) | Packet::SessionInfo(info) => format!(
            "session {}/{} (current {}) '{}' on {} [{}] at '{}': type {} time {} laps {} wait {} \
             ambient {} road {} weather {} elapsed {}ms",
            info.session_index,
            info.session_count,
            info.current_session_index,
            info.name,
            info.track,
            info.track_config,
            info.server_name,
            info.session_type,
            info.time,
            info.laps,
            info.wait_time,
            info.ambient_temp,
            info.road_temp,
            info.weather_graphics,
            info.elapsed_ms,
        ),
        Packet::NewConnection(event) | Packet::ConnectionClosed(event) => format!(
            "driver '{}' ({}) car {} {} [{}]",
            event.driver_name, event.driver_guid, event.car_id, event.car_model, event.car_skin
        ),
        Packet::CarUpdate(update) => format!(
            "car {} pos [{}, {}, {}] vel [{}, {}, {}] gear {} rpm {} spline {}",
            update.car_id,
            update.position.x,
            update.position.y,
            update.position.z,
            update.velocity.x,
            update.velocity.y,
            update.velocity.z,
            update.gear,
            update.engine_rpm,
            update.normalized_spline_pos,
        ),
        Packet::CarInfo(info) => format!(
            "car {} {} [{}] driver '{}' team '{}' guid {} connected {}",
            info.car_id,
            info.car_model,
            info.car_skin,
            info.driver_name,
            info.driver_team,
            info.driver_guid,
            info.is_connected,
        ),
        Packet::EndSession { report_path } => format!("report at {}", report_path),
        Packet::Version { protocol_version } => format!("protocol {}", protocol_version),
        Packet::Chat { car_id, message } => format!("car {}: {}", car_id, message),
        Packet::ClientLoaded { car_id } => format!("car {}", car_id),
        Packet::Error { message } => message.clone(),
        Packet::LapCompleted(lap) => {
            let board: Vec<String> = lap
                .leaderboard
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}: car {} time {} laps {}", i + 1, e.car_id, e.time, e.laps))
                .collect();
            format!(
                "car {} lap {}ms cuts {} grip {} leaderboard [{}]",
                lap.car_id,
                lap.lap_time,
                lap.cuts,
                lap.grip_level,
                board.join(", ")
            )
        }
        Packet::ClientEvent(event) => format!(
            "{} car {} other {} speed {} world [{}, {}, {}] rel [{}, {}, {}]",
            event.kind.name(),
            event.car_id,
            event.other_car_wire_id(),
            event.impact_speed,
            event.world_pos.x,
            event.world_pos.y,
            event.world_pos.z,
            event.rel_pos.x,
            event.rel_pos.y,
            event.rel_pos.z,
        ),
    }
}

use ringboard::{AddressScheme, ElectionEvent, VesselConfig, VesselEvent, VesselOptions};
use slog::Drain;
use std::error::Error;
use std::io;

const USAGE: &str = "usage: ringboard <vessel_id> <number_of_vessels> [port]";
const DEFAULT_PORT: u16 = 80;
const SUBNET_PREFIX: [u8; 3] = [10, 1, 0];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (my_vessel_id, number_of_vessels, port) = parse_args(&args).map_err(|e| format!("{}\n{}", e, USAGE))?;

    let logger = create_root_logger_for_stdout();
    let mut vessel = ringboard::try_create_vessel(VesselConfig {
        my_vessel_id,
        number_of_vessels,
        addressing: AddressScheme::Subnet {
            prefix: SUBNET_PREFIX,
            port,
        },
        info_logger: logger.clone(),
        options: VesselOptions::default(),
    })
    .await?;

    loop {
        tokio::select! {
            event = vessel.event_listener.next_event() => match event {
                Some(VesselEvent::Election(ElectionEvent::Leader)) => slog::info!(logger, "I am the leader"),
                Some(VesselEvent::Election(ElectionEvent::Follower(data))) => {
                    slog::info!(logger, "Following leader {}", data.leader_vessel_id)
                }
                Some(VesselEvent::Election(other)) => slog::info!(logger, "Election: {:?}", other),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                slog::info!(logger, "Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<(u32, u32, u16), String> {
    if args.len() < 2 || args.len() > 3 {
        return Err("wrong number of arguments".to_string());
    }

    let my_vessel_id = args[0]
        .parse::<u32>()
        .map_err(|e| format!("invalid vessel_id '{}': {}", args[0], e))?;
    let number_of_vessels = args[1]
        .parse::<u32>()
        .map_err(|e| format!("invalid number_of_vessels '{}': {}", args[1], e))?;
    let port = match args.get(2) {
        Some(raw) => raw.parse::<u16>().map_err(|e| format!("invalid port '{}': {}", raw, e))?,
        None => DEFAULT_PORT,
    };

    Ok((my_vessel_id, number_of_vessels, port))
}

fn create_root_logger_for_stdout() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator)
        .use_custom_timestamp(local_timestamp)
        .build()
        .fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!())
}

fn local_timestamp(io: &mut dyn io::Write) -> io::Result<()> {
    write!(io, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"))
}

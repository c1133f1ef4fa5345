use dotenv::dotenv;
use porygon::battle::{Item, Move, Party, TurnHandler};
use porygon::model::{Action, ActionDecoder};
use porygon::snapshot::BattleSnapshot;
use std::env;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn get_env_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("porygon=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

/// Reports the chosen callback instead of driving a simulator.
struct LoggingHandler<'a> {
    party: &'a Party,
}

impl TurnHandler for LoggingHandler<'_> {
    fn do_move(&mut self, chosen: &Move) {
        tracing::info!("Attack with {} ({}/{} PP)", chosen.name, chosen.pp, chosen.base_pp);
    }

    fn use_item(&mut self, item: &Item) {
        tracing::info!("Use item {}", item.name);
    }

    fn switch_pokemon(&mut self, slot: usize) {
        match self.party.battle_index_of_sorted(slot) {
            Ok(Some(index)) => {
                let name = self
                    .party
                    .get_at_index(index)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?");
                tracing::info!("Switch to {} (battle index {})", name, index);
            }
            _ => tracing::warn!("Switch to unknown canonical slot {}", slot),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let path = env::var("PORYGON_SNAPSHOT")
        .map_err(|_| "PORYGON_SNAPSHOT environment variable is required")?;
    let mut snapshot = BattleSnapshot::load(&path)?;

    if let Some(party_limit) = get_env_var("PORYGON_PARTY_LIMIT") {
        snapshot.config.party_limit = party_limit;
    }
    if let Some(move_limit) = get_env_var("PORYGON_MOVE_LIMIT") {
        snapshot.config.move_limit = move_limit;
    }
    if let Some(epsilon) = get_env_var("PORYGON_EPSILON") {
        snapshot.config.epsilon = epsilon;
    }
    snapshot.config.validate()?;
    tracing::info!("Config: {:?}", snapshot.config);

    if !snapshot.focused.can_battle() {
        tracing::warn!("{} has no Pokémon left that can battle", snapshot.focused.name);
    }

    let report = snapshot.evaluate()?;

    println!("Feature matrix ({} x {}):", report.features.rows(), report.features.columns());
    for row in report.features.iter_rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>10.4e}")).collect();
        println!("  {}", cells.join(" "));
    }

    if let Some(target) = &report.target {
        println!("Target switches: {:?}", target.switch_segment());
        println!("Target moves:    {:?}", target.move_segment());
        println!("Target outcome:  {}", target.outcome());
    }

    if let Some(terms) = &report.loss {
        println!(
            "Loss: {:.6} (outcome {:.6}, policy {:.6})",
            terms.total(),
            terms.outcome,
            terms.policy
        );
    }

    if let Some(output) = &report.output {
        let decoder = ActionDecoder::new(snapshot.config)?;
        let mut handler = LoggingHandler {
            party: snapshot.focused.party(),
        };
        match decoder.decode_action(output, &snapshot.focused, &snapshot.opponent, &mut handler)? {
            Action::Attack(chosen) => println!("Decision: attack with {}", chosen.name),
            Action::Switch(slot) => println!("Decision: switch to canonical slot {}", slot),
        }
    } else {
        tracing::info!("Snapshot has no model output, nothing to decode");
    }

    Ok(())
}

use bevy::prelude::*;
use obby_shared::GameConfig;

/// Tuning in effect for this run: defaults plus CLI/ENV overrides.
#[derive(Resource, Clone, Copy, Debug, Deref)]
pub struct Settings(pub GameConfig);

pub(super) fn plugin(app: &mut App) {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = read_config(GameConfig::default(), &args, |key| std::env::var(key).ok());
    app.insert_resource(Settings(config));
}

/// Values that can be overridden at launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tunable {
    Sensitivity,
    MoveSpeed,
    JumpSpeed,
    Gravity,
}

impl Tunable {
    const ALL: [Tunable; 4] = [
        Tunable::Sensitivity,
        Tunable::MoveSpeed,
        Tunable::JumpSpeed,
        Tunable::Gravity,
    ];

    fn flag(self) -> &'static str {
        match self {
            Tunable::Sensitivity => "--sensitivity",
            Tunable::MoveSpeed => "--move-speed",
            Tunable::JumpSpeed => "--jump-speed",
            Tunable::Gravity => "--gravity",
        }
    }

    fn env_var(self) -> &'static str {
        match self {
            Tunable::Sensitivity => "OBBY_SENSITIVITY",
            Tunable::MoveSpeed => "OBBY_MOVE_SPEED",
            Tunable::JumpSpeed => "OBBY_JUMP_SPEED",
            Tunable::Gravity => "OBBY_GRAVITY",
        }
    }

    fn apply(self, config: &mut GameConfig, value: f32) {
        match self {
            Tunable::Sensitivity => config.mouse_sensitivity = value,
            Tunable::MoveSpeed => config.move_speed = value,
            Tunable::JumpSpeed => config.jump_speed = value,
            Tunable::Gravity => config.gravity = value,
        }
    }
}

/// Apply overrides from CLI args or environment on top of `config`.
///
/// Supported, per tunable:
///   --move-speed <f>
///   --move-speed=<f>
///   OBBY_MOVE_SPEED environment variable
///
/// The command line wins over the environment. Values must be finite and positive; anything
/// else is logged and ignored.
fn read_config(
    mut config: GameConfig,
    args: &[String],
    env: impl Fn(&str) -> Option<String>,
) -> GameConfig {
    for tunable in Tunable::ALL {
        let Some(raw) = cli_value(args, tunable.flag()).or_else(|| env(tunable.env_var())) else {
            continue;
        };

        match raw.trim().parse::<f32>() {
            Ok(value) if value.is_finite() && value > 0.0 => {
                info!("Using {} = {value} from CLI/ENV.", tunable.flag());
                tunable.apply(&mut config, value);
            }
            _ => warn!(
                "Ignoring {} = {raw:?}; expected a positive number.",
                tunable.flag()
            ),
        }
    }

    config
}

fn cli_value(args: &[String], flag: &str) -> Option<String> {
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next().cloned();
        } else if let Some(val) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return Some(val.to_string());
        }
    }

    None
}

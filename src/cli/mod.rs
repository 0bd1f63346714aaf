//! CLI interface for the sculpture

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sculpture::controls::Slider;
use sculpture::envelope::{EnvelopeParameters, Param};

/// An ADSR envelope as a spiral sculpture and a tone
#[derive(Parser)]
#[command(name = "sculpture")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the terminal sculpture with live audio
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "sculpture.yaml")]
        config: PathBuf,

        /// Play the tone without the terminal UI until Ctrl-C
        #[arg(long)]
        headless: bool,

        #[command(flatten)]
        envelope: EnvelopeArgs,
    },

    /// Record the tone to a WAV file
    Record {
        /// Configuration file path
        #[arg(short, long, default_value = "sculpture.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: f64,

        #[command(flatten)]
        envelope: EnvelopeArgs,
    },

    /// Export the sculpture as a Wavefront OBJ file
    Export {
        /// Configuration file path
        #[arg(short, long, default_value = "sculpture.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        envelope: EnvelopeArgs,
    },

    /// Print the derived geometry and sound values
    Inspect {
        /// Configuration file path
        #[arg(short, long, default_value = "sculpture.yaml")]
        config: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Show the audio settings as if playback were on
        #[arg(long)]
        playing: bool,

        #[command(flatten)]
        envelope: EnvelopeArgs,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "sculpture.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

/// Envelope values overriding the configuration, in slider units
#[derive(Args, Debug, Default, Clone)]
pub struct EnvelopeArgs {
    /// Attack time in seconds (0-2)
    #[arg(long)]
    pub attack: Option<f64>,

    /// Decay time in seconds (0-1)
    #[arg(long)]
    pub decay: Option<f64>,

    /// Sustain level in percent (0-100)
    #[arg(long)]
    pub sustain: Option<f64>,

    /// Release time in seconds (0-5)
    #[arg(long)]
    pub release: Option<f64>,
}

impl EnvelopeArgs {
    /// Apply the given overrides on top of `params`
    ///
    /// Values without an override are snapped to their slider's step so the
    /// UI shows exactly what is playing.
    pub fn apply(&self, params: EnvelopeParameters) -> EnvelopeParameters {
        let overrides = [
            (Param::Attack, self.attack),
            (Param::Decay, self.decay),
            (Param::Sustain, self.sustain),
            (Param::Release, self.release),
        ];

        overrides
            .into_iter()
            .fold(params, |params, (param, value)| {
                let slider = Slider::for_param(param);
                slider.apply(params, value.unwrap_or_else(|| slider.value(&params)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_overrides_keep_params() {
        let params = EnvelopeParameters::new(0.3, 0.2, 0.9, 2.0);
        assert_eq!(EnvelopeArgs::default().apply(params), params);
    }

    #[test]
    fn test_config_values_snap_to_slider_steps() {
        let params = EnvelopeArgs::default().apply(EnvelopeParameters::new(0.33, 0.5, 0.5, 1.0));
        let attack = Slider::for_param(Param::Attack);
        assert_eq!(params.attack(), 0.35);
        assert_eq!(attack.value(&params), params.attack());
    }

    #[test]
    fn test_overrides_use_slider_units() {
        let cli = Cli::parse_from([
            "sculpture", "inspect", "--sustain", "75", "--release", "9", "--attack", "1.23",
        ]);
        let Commands::Inspect { envelope, .. } = cli.command else {
            panic!("expected inspect");
        };

        let params = envelope.apply(EnvelopeParameters::default());
        assert_eq!(params.sustain(), 0.75);
        assert_eq!(params.release(), 5.0);
        assert_eq!(params.attack(), 1.25);
        assert_eq!(params.decay(), 0.5);
    }
}

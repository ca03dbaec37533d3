use clap::{Parser, Subcommand};
use registry_core::{
    clinical::{choices_by_enum_name, ENUM_NAMES},
    password::password_strength,
    CoreConfig, FormChoices, FormData, FormKind, RegistryError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "registry")]
#[command(about = "Hernia registry forms CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the form slugs accepted by `validate`
    Forms,
    /// Print the choice list of a clinical enumeration
    Choices {
        /// Enumeration name, e.g. Cepod or Pain
        name: String,
        /// Prefix the blank "(Any)" choice
        #[arg(long)]
        blank: bool,
    },
    /// Bind and validate a submission, printing the report as JSON
    Validate {
        /// Form slug, e.g. followup
        kind: String,
        /// Submitted fields as key=value
        fields: Vec<String>,
        /// JSON file with centers, patients, attendees, procedures and mesh_types lists
        #[arg(long)]
        reference: Option<PathBuf>,
        /// Minimum password strength (0..=1)
        #[arg(long)]
        min_strength: Option<f64>,
    },
    /// Print the estimated strength of a password
    Strength {
        password: String,
    },
}

fn read_reference(path: &Path) -> Result<FormChoices, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Forms) => {
            for kind in FormKind::ALL {
                println!("{kind}");
            }
        }
        Some(Commands::Choices { name, blank }) => match choices_by_enum_name(&name, blank) {
            Some(choices) => println!("{}", serde_json::to_string_pretty(&choices)?),
            None => {
                eprintln!(
                    "{}; expected one of: {}",
                    RegistryError::UnknownEnum(name),
                    ENUM_NAMES.join(", ")
                );
                return Ok(ExitCode::from(2));
            }
        },
        Some(Commands::Validate {
            kind,
            fields,
            reference,
            min_strength,
        }) => {
            let kind = kind.parse::<FormKind>()?;
            let data = FormData::parse_pairs(&fields)?;
            let choices = match reference {
                Some(path) => read_reference(&path)?,
                None => FormChoices::default(),
            };
            let cfg = match min_strength {
                Some(strength) => CoreConfig::new(strength, CoreConfig::default().site_name().into())?,
                None => CoreConfig::default(),
            };

            let report = kind.process(&data, &choices, &cfg);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Strength { password }) => {
            println!("{:.2}", password_strength(&password));
        }
        None => {
            println!("No command given. Use --help for usage.");
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_collects_trailing_pairs() {
        let cli = Cli::try_parse_from([
            "registry",
            "validate",
            "followup",
            "pain=1",
            "pain_comments=a=b",
            "--reference",
            "ref.json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Commands::Validate {
                kind,
                fields,
                reference,
                min_strength,
            }) => {
                assert_eq!(kind, "followup");
                assert_eq!(fields, vec!["pain=1", "pain_comments=a=b"]);
                assert_eq!(reference, Some(PathBuf::from("ref.json")));
                assert_eq!(min_strength, None);

                let data = FormData::parse_pairs(&fields).expect("pairs parse");
                assert_eq!(data.get("pain_comments"), Some("a=b"));
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn choices_accepts_blank_flag() {
        let cli = Cli::try_parse_from(["registry", "choices", "Cepod", "--blank"])
            .expect("arguments parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Choices { ref name, blank: true }) if name == "Cepod"
        ));
    }

    #[test]
    fn reference_file_may_omit_lists() {
        let choices: FormChoices =
            serde_json::from_str(r#"{"centers":[{"id":1,"name":"Kisiizi"}]}"#)
                .expect("partial reference parses");
        assert_eq!(choices.centers.len(), 1);
        assert!(choices.attendees.is_empty());
    }
}

pub mod commands;

use clap::{Args, Parser, Subcommand};
use haulquote_core::{FieldKey, FormFields, WizardVariant};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "haulquote",
    about = "Haulquote trucking insurance quote wizard",
    long_about = "Estimate trucking insurance premiums, drive the quote wizard end to end, and inspect configuration.",
    after_help = "Examples:\n  haulquote estimate --trucks 2 --cdl-band preferred --states TX --consent\n  haulquote submit --full-name 'Dana Ruiz' --email dana@ruizfreight.test --phone 555-0100 --company 'Ruiz Freight' --dry-run\n  haulquote config\n  haulquote steps --variant extended"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a fleet from field flags and print the quote as JSON")]
    Estimate {
        #[command(flatten)]
        form: FormArgs,
    },
    #[command(about = "Walk every wizard step, price the fleet and deliver the lead")]
    Submit {
        #[command(flatten)]
        form: FormArgs,
        #[arg(long, help = "Override the lead intake endpoint for this run")]
        endpoint: Option<String>,
        #[arg(long, help = "Wizard layout to walk (standard|extended)")]
        variant: Option<WizardVariant>,
        #[arg(long, help = "Capture the lead without sending it anywhere")]
        dry_run: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "List the steps and fields of the wizard layout")]
    Steps {
        #[arg(long, help = "Wizard layout to list (standard|extended)")]
        variant: Option<WizardVariant>,
    },
}

/// Raw form input, applied through the same parsing the wizard uses.
#[derive(Clone, Debug, Default, Args)]
pub struct FormArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub mc_number: Option<String>,
    #[arg(long, help = "Power units; non-numeric input counts as 1")]
    pub trucks: Option<String>,
    #[arg(long, help = "elite|preferred|standard|watchlist")]
    pub cdl_band: Option<String>,
    #[arg(long = "policy", help = "Requested policy; repeat for several")]
    pub policies: Vec<String>,
    #[arg(long, help = "Operating lanes, e.g. 'TX, OK'")]
    pub states: Option<String>,
    #[arg(long)]
    pub loss_runs: Option<String>,
    #[arg(long, help = "Consent to pull loss runs")]
    pub consent: bool,
    #[arg(long, help = "asap|week|flexible")]
    pub timeline: Option<String>,
}

impl FormArgs {
    pub fn entries(&self) -> Vec<(FieldKey, String)> {
        let mut entries = Vec::new();
        let text_fields = [
            (FieldKey::FullName, &self.full_name),
            (FieldKey::Email, &self.email),
            (FieldKey::Phone, &self.phone),
            (FieldKey::Company, &self.company),
            (FieldKey::McNumber, &self.mc_number),
            (FieldKey::Trucks, &self.trucks),
            (FieldKey::CdlBand, &self.cdl_band),
            (FieldKey::States, &self.states),
            (FieldKey::LossRuns, &self.loss_runs),
            (FieldKey::Timeline, &self.timeline),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                entries.push((key, value.clone()));
            }
        }
        if !self.policies.is_empty() {
            entries.push((FieldKey::Policies, self.policies.join(",")));
        }
        if self.consent {
            entries.push((FieldKey::Consent, "on".to_string()));
        }
        entries
    }

    pub fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::default();
        for (key, value) in self.entries() {
            fields.set_field(key, &value);
        }
        fields
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Estimate { form } => commands::estimate::run(&form),
        Command::Submit { form, endpoint, variant, dry_run } => {
            let options = commands::submit::SubmitOptions { endpoint, variant, dry_run };
            commands::submit::run(&form, options)
        }
        Command::Config => commands::config::run(),
        Command::Steps { variant } => commands::steps::run(variant),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

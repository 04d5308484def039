//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "pugview",
    bin_name = "pugview",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Render and generate application views",
    long_about = "pugview renders views from the application's views directory \
                  with configured globals, and generates new view files.",
    after_help = "EXAMPLES:\n\
        \x20 pugview make:pug users.profile --layout layouts/main\n\
        \x20 pugview render users/index --data '{\"title\": \"Users\"}'\n\
        \x20 pugview render --inline '{{ config(\"app.name\") }}'\n\
        \x20 pugview completions bash > /usr/share/bash-completion/completions/pugview",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new view file.
    #[command(
        name = "make:pug",
        visible_alias = "make",
        about = "Make a new pug template",
        after_help = "EXAMPLES:\n\
            \x20 pugview make:pug home\n\
            \x20 pugview make:pug UserView.profile      # resources/views/user/profile.pug\n\
            \x20 pugview make:pug posts.show -l layouts/main"
    )]
    MakePug(MakePugArgs),

    /// Render a view to stdout.
    #[command(
        about = "Render a view",
        after_help = "EXAMPLES:\n\
            \x20 pugview render home\n\
            \x20 pugview render users/index --data '{\"users\": []}'\n\
            \x20 pugview render --inline 'Hello {{ name }}' --data '{\"name\": \"Ada\"}'"
    )]
    Render(RenderArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 pugview completions bash > ~/.local/share/bash-completion/completions/pugview\n\
            \x20 pugview completions zsh  > ~/.zfunc/_pugview\n\
            \x20 pugview completions fish > ~/.config/fish/completions/pugview.fish"
    )]
    Completions(CompletionsArgs),
}

// ── make:pug ──────────────────────────────────────────────────────────────────

/// Arguments for `pugview make:pug`.
#[derive(Debug, Args)]
pub struct MakePugArgs {
    /// Name of the view; dots nest directories.
    #[arg(value_name = "NAME", help = "Name of the view")]
    pub name: String,

    /// Layout the new view extends.
    #[arg(
        short = 'l',
        long = "layout",
        value_name = "LAYOUT",
        help = "Define a layout to extend"
    )]
    pub layout: Option<String>,

    /// Overwrite an existing view.
    #[arg(long = "force", help = "Overwrite the view if it exists")]
    pub force: bool,
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `pugview render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// View name relative to the views directory, without extension.
    /// With `--inline`, the template source itself.
    #[arg(value_name = "VIEW", help = "View name, or template source with --inline")]
    pub view: String,

    /// Call-site options as a JSON object.
    #[arg(long = "data", value_name = "JSON", help = "Template data as a JSON object")]
    pub data: Option<String>,

    /// Treat VIEW as template source.
    #[arg(long = "inline", help = "Render VIEW as a template string")]
    pub inline: bool,

    /// Let `--data` override registered globals on collision.
    #[arg(
        long = "call-site-wins",
        help = "Let --data override globals with the same name"
    )]
    pub call_site_wins: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `pugview completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_make_pug() {
        let cli = Cli::try_parse_from(["pugview", "make:pug", "users.show", "-l", "layouts/main"])
            .unwrap();
        match cli.command {
            Commands::MakePug(args) => {
                assert_eq!(args.name, "users.show");
                assert_eq!(args.layout.as_deref(), Some("layouts/main"));
                assert!(!args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn make_alias() {
        let cli = Cli::try_parse_from(["pugview", "make", "home", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::MakePug(MakePugArgs { force: true, .. })));
    }

    #[test]
    fn parse_render() {
        let cli = Cli::try_parse_from([
            "pugview",
            "render",
            "home",
            "--data",
            "{}",
            "--call-site-wins",
        ])
        .unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.view, "home");
                assert_eq!(args.data.as_deref(), Some("{}"));
                assert!(args.call_site_wins);
                assert!(!args.inline);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["pugview", "-q", "-v", "render", "home"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pugview", "render", "home", "-vv", "--config", "x.toml"])
            .unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.config.as_deref(), Some(std::path::Path::new("x.toml")));
    }
}

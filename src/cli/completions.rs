use clap::Args;

/// Arguments for completions command
#[derive(Args, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    skill-ingest completions bash > ~/.bash_completion.d/skill-ingest\n\n\
                  Generate zsh completions:\n    skill-ingest completions zsh > ~/.zfunc/_skill-ingest\n\n\
                  Generate fish completions:\n    skill-ingest completions fish > ~/.config/fish/completions/skill-ingest.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}

//! Command-line argument parsing for the gptchat binary.

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: gptchat [OPTIONS] [PROMPT...]

Chat with the completion API from the terminal. With a PROMPT, send it,
print the reply and exit. Without one, read prompts from stdin.

Options:
  -m, --model <MODEL>   Model to request
  -p, --proxy <URL>     Send requests to URL instead of the default endpoint
  -o, --org <ID>        Organization id
  -h, --help            Print help
  -V, --version         Print version

Environment:
  GPTCHAT_ACCESS_TOKEN  Bearer token (required)
  GPTCHAT_PROXY, GPTCHAT_ORGANIZATION, GPTCHAT_MODEL, GPTCHAT_TIMEOUT_SECS
  RUST_LOG              Log filter, e.g. gptchat=debug

Commands while chatting:
  /clear     Forget the conversation so far
  /history   Print the conversation so far
  /exit      Quit
";

/// Options for a chat run. Unset options fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatArgs {
    pub model: Option<String>,
    pub proxy: Option<String>,
    pub organization: Option<String>,
    /// One-shot prompt; interactive when `None`
    pub prompt: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments could not be parsed; holds the reason
    Invalid(String),
    /// Chat (default)
    Chat(ChatArgs),
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use gptchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["gptchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut chat = ChatArgs::default();
    let mut words: Vec<String> = Vec::new();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--model" | "-m" => &mut chat.model,
            "--proxy" | "-p" => &mut chat.proxy,
            "--org" | "-o" => &mut chat.organization,
            "--" => {
                words.extend(args.by_ref());
                break;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return CliCommand::Invalid(format!("unknown option: {}", flag));
            }
            _ => {
                words.push(arg.clone());
                continue;
            }
        };

        match args.next() {
            Some(value) => *slot = Some(value),
            None => return CliCommand::Invalid(format!("{} needs a value", arg)),
        }
    }

    if !words.is_empty() {
        chat.prompt = Some(words.join(" "));
    }
    CliCommand::Chat(chat)
}

//! Module `commands`
//!
//! Defines the lobby protocol command set and the line parser producing it.
//!
//! Verbs are case-sensitive (`Marco` is a live command, `marco` is not). A
//! known verb with a missing or ill-typed argument parses to `Invalid`; an
//! unrecognized verb parses to `Unknown`. Both are no-ops downstream, the
//! distinction only affects logging.

/// A command parsed from one inbound line.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Liveness probe, answered with `Polo`.
    Marco,
    /// Create a channel (and auto-join it).
    Create(String),
    /// Enumerate channels.
    List,
    /// Join an existing channel.
    Join(String),
    /// Leave the current channel.
    Part,
    /// Request the member list of the current channel.
    Users,
    /// Chat relay to the whole channel.
    Msg(String),
    /// Rename the sender.
    Nick(String),
    /// Signal game start to the whole channel.
    Start,
    /// Deal a random piece id to the whole channel.
    Piece,
    /// Overwrite the sender's live score.
    Score(i64),
    /// Broadcast the sender's score and lives to the others.
    Scores,
    /// Overwrite the sender's live count.
    Lives(i64),
    /// Leaderboard upsert, `<name>:<score>`.
    HiScore { name: String, score: i64 },
    /// Leaderboard read.
    HiScores,
    /// Eliminated: leave the channel.
    Die,
    /// Known verb, unusable argument. Logged no-op.
    Invalid(&'static str),
    /// Unrecognized verb. Silently ignored.
    Unknown,
}

/// Returns true for names usable as channel keys: non-empty, no whitespace.
fn valid_channel_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace)
}

/// Parses one raw line into a `Command`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();

    match verb {
        "Marco" => Command::Marco,
        "CREATE" if valid_channel_name(arg) => Command::Create(arg.to_string()),
        "CREATE" => Command::Invalid("CREATE"),
        "LIST" => Command::List,
        "JOIN" if valid_channel_name(arg) => Command::Join(arg.to_string()),
        "JOIN" => Command::Invalid("JOIN"),
        "PART" => Command::Part,
        "USERS" => Command::Users,
        "MSG" if !arg.is_empty() => Command::Msg(arg.to_string()),
        "MSG" => Command::Invalid("MSG"),
        "NICK" if !arg.is_empty() => Command::Nick(arg.to_string()),
        "NICK" => Command::Invalid("NICK"),
        "START" => Command::Start,
        "PIECE" => Command::Piece,
        "SCORE" => match arg.parse::<i64>() {
            Ok(score) => Command::Score(score),
            Err(_) => Command::Invalid("SCORE"),
        },
        "SCORES" => Command::Scores,
        "LIVES" => match arg.parse::<i64>() {
            Ok(lives) => Command::Lives(lives),
            Err(_) => Command::Invalid("LIVES"),
        },
        "HISCORE" => parse_hiscore(arg),
        "HISCORES" => Command::HiScores,
        "DIE" => Command::Die,
        _ => Command::Unknown,
    }
}

/// `HISCORE` carries `<name>:<score>`; the name may itself contain colons,
/// so the score is taken from the last colon.
fn parse_hiscore(arg: &str) -> Command {
    let Some((name, score)) = arg.rsplit_once(':') else {
        return Command::Invalid("HISCORE");
    };
    if name.is_empty() {
        return Command::Invalid("HISCORE");
    }
    match score.trim().parse::<i64>() {
        Ok(score) => Command::HiScore {
            name: name.to_string(),
            score,
        },
        Err(_) => Command::Invalid("HISCORE"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_case_sensitive() {
        assert_eq!(parse_command("Marco"), Command::Marco);
        assert_eq!(parse_command("marco"), Command::Unknown);
        assert_eq!(parse_command("MARCO"), Command::Unknown);
        assert_eq!(parse_command("join lobby1"), Command::Unknown);
    }

    #[test]
    fn arguments_are_captured() {
        assert_eq!(parse_command("JOIN lobby1\n"), Command::Join("lobby1".into()));
        assert_eq!(parse_command("CREATE lobby2"), Command::Create("lobby2".into()));
        assert_eq!(parse_command("NICK Ace"), Command::Nick("Ace".into()));
        assert_eq!(parse_command("MSG hello there"), Command::Msg("hello there".into()));
        assert_eq!(parse_command("SCORE 1500"), Command::Score(1500));
        assert_eq!(parse_command("LIVES -1"), Command::Lives(-1));
    }

    #[test]
    fn missing_arguments_are_invalid_not_fatal() {
        assert_eq!(parse_command("JOIN"), Command::Invalid("JOIN"));
        assert_eq!(parse_command("JOIN   "), Command::Invalid("JOIN"));
        assert_eq!(parse_command("CREATE"), Command::Invalid("CREATE"));
        assert_eq!(parse_command("MSG"), Command::Invalid("MSG"));
        assert_eq!(parse_command("SCORE ten"), Command::Invalid("SCORE"));
        assert_eq!(parse_command("SCORE"), Command::Invalid("SCORE"));
    }

    #[test]
    fn channel_names_reject_whitespace() {
        assert_eq!(parse_command("JOIN my lobby"), Command::Invalid("JOIN"));
        assert_eq!(parse_command("CREATE a b"), Command::Invalid("CREATE"));
    }

    #[test]
    fn hiscore_splits_on_the_last_colon() {
        assert_eq!(
            parse_command("HISCORE Ace:1200"),
            Command::HiScore {
                name: "Ace".into(),
                score: 1200
            }
        );
        assert_eq!(
            parse_command("HISCORE a:b:300"),
            Command::HiScore {
                name: "a:b".into(),
                score: 300
            }
        );
        assert_eq!(parse_command("HISCORE Ace"), Command::Invalid("HISCORE"));
        assert_eq!(parse_command("HISCORE :10"), Command::Invalid("HISCORE"));
        assert_eq!(parse_command("HISCORE Ace:lots"), Command::Invalid("HISCORE"));
    }

    #[test]
    fn bare_verbs_parse() {
        assert_eq!(parse_command("LIST"), Command::List);
        assert_eq!(parse_command("PART"), Command::Part);
        assert_eq!(parse_command("USERS"), Command::Users);
        assert_eq!(parse_command("START"), Command::Start);
        assert_eq!(parse_command("PIECE"), Command::Piece);
        assert_eq!(parse_command("SCORES"), Command::Scores);
        assert_eq!(parse_command("HISCORES"), Command::HiScores);
        assert_eq!(parse_command("DIE"), Command::Die);
    }

    #[test]
    fn junk_is_unknown() {
        assert_eq!(parse_command(""), Command::Unknown);
        assert_eq!(parse_command("   "), Command::Unknown);
        assert_eq!(parse_command("FLY me to the moon"), Command::Unknown);
    }
}

use chatter_autocomplete::{Candidate, Row, SearchContext, Searcher, Selection, TextBuffer, Trigger};

const MEMBERS: &[(&str, &str)] = &[
    ("alice", "Alice Liddell"),
    ("alfred", "Alfred Pennyworth"),
    ("bob", "Bob Belcher"),
    ("carol", "Carol Danvers"),
    ("dave", "Dave Lister"),
];

const EMOJI: &[(&str, &str)] = &[
    ("smile", "😄"),
    ("smirk", "😏"),
    ("sob", "😭"),
    ("heart", "❤️"),
    ("thumbsup", "👍"),
    ("tada", "🎉"),
];

const COMMANDS: &[(&str, &str)] = &[
    ("/me", "Send an emote"),
    ("/nick", "Change your display name"),
    ("/shrug", "Append ¯\\_(ツ)_/¯"),
    ("/topic", "Set the room topic"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub display_name: String,
}

impl Candidate for Member {
    fn render(&self) -> Row {
        Row::new(self.display_name.clone()).with_detail(format!("@{}", self.id))
    }
}

/// Room members, matched on id or display name.
pub struct MemberSearcher;

impl Searcher for MemberSearcher {
    fn trigger(&self) -> Trigger {
        Trigger::Char('@')
    }

    fn search(&self, ctx: &SearchContext, query: &str) -> Vec<Box<dyn Candidate>> {
        let query = query.to_lowercase();
        let mut results: Vec<Box<dyn Candidate>> = Vec::new();
        for (id, display_name) in MEMBERS {
            if ctx.is_cancelled() {
                break;
            }
            if id.starts_with(&query) || display_name.to_lowercase().contains(&query) {
                results.push(Box::new(Member {
                    id: id.to_string(),
                    display_name: display_name.to_string(),
                }));
            }
        }
        results
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emoji {
    pub shortcode: &'static str,
    pub glyph: &'static str,
}

impl Candidate for Emoji {
    fn render(&self) -> Row {
        Row::new(format!("{} :{}:", self.glyph, self.shortcode))
    }
}

pub struct EmojiSearcher;

impl Searcher for EmojiSearcher {
    fn trigger(&self) -> Trigger {
        Trigger::Char(':')
    }

    fn search(&self, _ctx: &SearchContext, query: &str) -> Vec<Box<dyn Candidate>> {
        EMOJI
            .iter()
            .filter(|(shortcode, _)| shortcode.starts_with(query))
            .map(|&(shortcode, glyph)| Box::new(Emoji { shortcode, glyph }) as Box<dyn Candidate>)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
}

impl Candidate for Command {
    fn render(&self) -> Row {
        Row::new(self.name).with_detail(self.help)
    }
}

/// Slash commands, offered for plain words that start with `/`.
pub struct CommandSearcher;

impl Searcher for CommandSearcher {
    fn trigger(&self) -> Trigger {
        Trigger::WordBoundary
    }

    fn search(&self, _ctx: &SearchContext, query: &str) -> Vec<Box<dyn Candidate>> {
        if !query.starts_with('/') {
            return Vec::new();
        }
        COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(query))
            .map(|&(name, help)| Box::new(Command { name, help }) as Box<dyn Candidate>)
            .collect()
    }
}

/// Replaces the matched word with whatever the chosen entry stands for.
pub fn apply_selection<B: TextBuffer>(selection: &mut Selection<'_, B>) -> bool {
    let candidate = selection.candidate();
    let replacement = if let Some(member) = candidate.downcast_ref::<Member>() {
        format!("@{}", member.id)
    } else if let Some(emoji) = candidate.downcast_ref::<Emoji>() {
        emoji.glyph.to_string()
    } else if let Some(command) = candidate.downcast_ref::<Command>() {
        command.name.to_string()
    } else {
        return false;
    };

    selection.replace(&replacement);
    true
}

//! What the skill says back

pub const SKILL_NAME: &str = "Incoherent Game";

const LAUNCH_REPROMPT: &str = "Say yes to start the game or no to quit.";
const PLAYING_REPROMPT: &str = "Try to guess the gibberish or say stop to quit.";
const HELP: &str = "I will say a phrase that sounds like gibberish. Say it out loud and \
    guess the real words hiding in it. Say repeat to hear it again, skip for a new one, \
    or stop to quit.";
const HELP_REPROMPT: &str = "Guess the gibberish, or say stop to quit.";
const UNRECOGNIZED: &str = "Say yes to continue or no to end the game!!";
const APOLOGY: &str = "Sorry, I can't understand that. Please say it again!!";

/// A spoken reply: speech, an optional reprompt, and whether the session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub speech_text: String,
    pub reprompt_text: Option<String>,
    pub should_end_session: bool,
}

impl Reply {
    /// Speak and keep listening
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech_text: speech.into(),
            reprompt_text: Some(reprompt.into()),
            should_end_session: false,
        }
    }

    /// Speak and end the session
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech_text: speech.into(),
            reprompt_text: None,
            should_end_session: true,
        }
    }

    pub fn welcome(games_played: u64) -> Self {
        Self::ask(
            format!(
                "Welcome to Incoherent. You have played {games_played} times. Would you like to play?"
            ),
            LAUNCH_REPROMPT,
        )
    }

    pub fn first_gibberish(gibberish: &str) -> Self {
        Self::ask(
            format!(
                "Your gibberish is: {gibberish}. Say repeat to hear it again, or skip for a new one."
            ),
            gibberish,
        )
    }

    pub fn repeat(gibberish: &str) -> Self {
        Self::ask(format!("The gibberish is: {gibberish}"), gibberish)
    }

    pub fn skipped(gibberish: &str) -> Self {
        Self::ask(format!("Your new gibberish is: {gibberish}"), gibberish)
    }

    pub fn correct(guess: &str, gibberish: &str) -> Self {
        Self::ask(
            format!("Nice! {guess} was the correct answer! Your new gibberish is: {gibberish}"),
            gibberish,
        )
    }

    pub fn wrong(gibberish: &str) -> Self {
        Self::ask(format!("That was wrong. The gibberish is: {gibberish}"), gibberish)
    }

    pub fn goodbye() -> Self {
        Self::tell("Ok. See you next time!!")
    }

    pub fn thanks() -> Self {
        Self::tell("Thanks for playing!!")
    }

    pub fn help() -> Self {
        Self::ask(HELP, HELP_REPROMPT)
    }

    /// Context-aware "can't help with that"
    pub fn fallback(is_playing: bool) -> Self {
        if is_playing {
            Self::ask(
                format!("The {SKILL_NAME} can't help you with that. {PLAYING_REPROMPT}"),
                PLAYING_REPROMPT,
            )
        } else {
            Self::ask(
                format!("The {SKILL_NAME} can't help you with that. Would you like to play?"),
                LAUNCH_REPROMPT,
            )
        }
    }

    pub fn unrecognized() -> Self {
        Self::ask(UNRECOGNIZED, UNRECOGNIZED)
    }

    /// Said whenever a turn fails
    pub fn apology() -> Self {
        Self::ask(APOLOGY, APOLOGY)
    }
}

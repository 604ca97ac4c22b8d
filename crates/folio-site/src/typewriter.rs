//! Hero typewriter animation.
//!
//! The animation cycles through a fixed list of phrases: type one character
//! per tick, hold the full phrase, delete one character per tick, then move
//! on to the next phrase. The machine is driven by a virtual clock
//! ([`Typewriter::advance`]) so it can be stepped deterministically; the
//! async [`Typewriter::run`] driver sleeps between ticks for real use.
//!
//! ```rust
//! use std::time::Duration;
//! use folio_site::typewriter::{Phase, Typewriter};
//!
//! let mut tw = Typewriter::new(vec!["Hi".to_string()]).unwrap();
//! tw.advance(Duration::from_millis(200));
//! assert_eq!(tw.text(), "Hi");
//! assert_eq!(tw.phase(), Phase::Typing { word: 0, pos: 2 });
//! ```

use std::time::Duration;

use folio_core::{Error, Result, ViewHandle};

/// Delay between typed characters.
pub const TYPING_DELAY: Duration = Duration::from_millis(100);

/// How long a finished phrase stays on screen.
pub const PAUSE_DELAY: Duration = Duration::from_millis(2000);

/// Delay between deleted characters.
pub const DELETING_DELAY: Duration = Duration::from_millis(50);

/// Where the animation is. Positions count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Revealing `word`; `pos` characters are visible.
    Typing {
        /// Index into the phrase list
        word: usize,
        /// Visible characters
        pos: usize,
    },
    /// Holding the full phrase.
    Pausing {
        /// Index into the phrase list
        word: usize,
    },
    /// Removing `word`; `pos` characters are still visible.
    Deleting {
        /// Index into the phrase list
        word: usize,
        /// Visible characters
        pos: usize,
    },
}

/// Typewriter state machine over a cyclic phrase list.
#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<String>,
    phase: Phase,
    carry: Duration,
}

impl Typewriter {
    /// Creates a typewriter at the start of the first phrase.
    ///
    /// Fails if `words` is empty.
    pub fn new(words: Vec<String>) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::validation_field(
                "typewriter_words",
                "at least one phrase is required",
            ));
        }
        Ok(Self {
            words,
            phase: Phase::Typing { word: 0, pos: 0 },
            carry: Duration::ZERO,
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The phrase list.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Text currently visible.
    pub fn text(&self) -> String {
        match self.phase {
            Phase::Typing { word, pos } | Phase::Deleting { word, pos } => {
                self.words[word].chars().take(pos).collect()
            }
            Phase::Pausing { word } => self.words[word].clone(),
        }
    }

    /// Interval until the next tick in the current phase.
    pub fn next_delay(&self) -> Duration {
        match self.phase {
            Phase::Typing { .. } => TYPING_DELAY,
            Phase::Pausing { .. } => PAUSE_DELAY,
            Phase::Deleting { .. } => DELETING_DELAY,
        }
    }

    /// Applies one transition.
    pub fn tick(&mut self) {
        self.phase = match self.phase {
            Phase::Typing { word, pos } if pos < self.char_len(word) => {
                Phase::Typing { word, pos: pos + 1 }
            }
            Phase::Typing { word, .. } => Phase::Pausing { word },
            Phase::Pausing { word } => Phase::Deleting {
                word,
                pos: self.char_len(word),
            },
            Phase::Deleting { word, pos } if pos > 0 => Phase::Deleting { word, pos: pos - 1 },
            Phase::Deleting { word, .. } => Phase::Typing {
                word: (word + 1) % self.words.len(),
                pos: 0,
            },
        };
    }

    /// Advances the virtual clock by `elapsed`, applying every tick that
    /// falls due. Time left over counts towards the next tick.
    ///
    /// Returns the number of ticks applied.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.carry += elapsed;
        let mut ticks = 0;
        loop {
            let delay = self.next_delay();
            if self.carry < delay {
                break;
            }
            self.carry -= delay;
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Restarts at the beginning of the first phrase.
    pub fn reset(&mut self) {
        self.phase = Phase::Typing { word: 0, pos: 0 };
        self.carry = Duration::ZERO;
    }

    /// Runs the animation until `view` is unmounted, calling `render` with
    /// the visible text initially and after every tick.
    pub async fn run<F>(&mut self, view: &ViewHandle, mut render: F)
    where
        F: FnMut(&str),
    {
        render(&self.text());
        loop {
            tokio::select! {
                biased;
                _ = view.unmounted() => break,
                _ = tokio::time::sleep(self.next_delay()) => {
                    self.tick();
                    render(&self.text());
                }
            }
        }
        tracing::debug!(view = view.name(), "Typewriter stopped");
    }

    fn char_len(&self, word: usize) -> usize {
        self.words[word].chars().count()
    }
}

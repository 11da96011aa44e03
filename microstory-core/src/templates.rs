//! Story templates organized by genre.
//!
//! Each genre has opening, middle and ending templates. Every template uses
//! the `{character}`, `{place}` and `{object}` placeholders.

use crate::genre::{Genre, Slot};

/// Placeholder for the character keyword.
pub const CHARACTER: &str = "{character}";
/// Placeholder for the place keyword.
pub const PLACE: &str = "{place}";
/// Placeholder for the (possibly decorated) object keyword.
pub const OBJECT: &str = "{object}";

/// Words that may be placed in front of the object keyword.
pub const OBJECT_ADJECTIVES: [&str; 6] = [
    "mysterious",
    "ancient",
    "forgotten",
    "gleaming",
    "strange",
    "legendary",
];

/// The three template sequences for one genre.
#[derive(Debug)]
pub struct GenreTemplates {
    pub opening: &'static [&'static str],
    pub middle: &'static [&'static str],
    pub ending: &'static [&'static str],
}

impl GenreTemplates {
    pub fn slot(&self, slot: Slot) -> &'static [&'static str] {
        match slot {
            Slot::Opening => self.opening,
            Slot::Middle => self.middle,
            Slot::Ending => self.ending,
        }
    }
}

static ADVENTURE: GenreTemplates = GenreTemplates {
    opening: &[
        "Once upon a time, a {character} set out on a quest into the {place}, seeking a legendary {object}.",
        "A {character} ventured deep into the {place}, where rumor spoke of a powerful {object}.",
    ],
    middle: &[
        "As they pressed onward, the {character} faced trials that tested their resolve. The {place} seemed to come alive around them, and thoughts of the {object} kept them going.",
        "The journey through the {place} was treacherous, but the {character} pressed on, driven by the hope of finding the {object}.",
    ],
    ending: &[
        "At last, the {character} discovered the {object} gleaming in a hidden grove of the {place}. Their adventure had only just begun.",
        "With the {object} finally in their grasp, the {character} knew the {place} would forever hold a special place in their heart.",
    ],
};

static MYSTERY: GenreTemplates = GenreTemplates {
    opening: &[
        "In the heart of the {place}, a {character} stumbled upon a clue connected to a vanished {object}.",
        "The {character} had come to the {place} to investigate the strange disappearance of a {object}.",
    ],
    middle: &[
        "Piece by piece, the {character} unraveled the mystery. The {place} held secrets about the missing {object} that had been buried for decades.",
        "Every corner of the {place} seemed to whisper hints. The {character} followed the trail, each clue leading closer to the {object}.",
    ],
    ending: &[
        "The truth emerged at last: the {object} had been hidden in plain sight in the {place} all along. The {character} smiled, case closed.",
        "Mystery solved. The {character} stood in the {place}, the {object} finally returned to its rightful place.",
    ],
};

static FANTASY: GenreTemplates = GenreTemplates {
    opening: &[
        "Long ago, a {character} guarded a magical {object} hidden deep within the enchanted {place}.",
        "In the mystical {place}, there lived a {character} who dreamed of wielding a legendary {object}.",
    ],
    middle: &[
        "Magic flowed through the {place} like a river of light. The {character} felt the presence of the {object} calling to them.",
        "The {place} was a realm of wonder, where the ordinary rules did not apply. The {character} drew closer to the fabled {object}.",
    ],
    ending: &[
        "With a burst of enchantment, the {character} claimed the {object}. The {place} sang with ancient power.",
        "The {object} shimmered in the {character}'s hands. In the heart of the {place}, a new legend was born.",
    ],
};

static SCI_FI: GenreTemplates = GenreTemplates {
    opening: &[
        "On a distant colony in the {place}, a {character} discovered a prototype {object} of unknown origin.",
        "The {character} had been assigned to the {place} research station to analyze an anomalous {object}.",
    ],
    middle: &[
        "The {character} studied the readings. The {place} hummed with energy that defied known physics. The {object} pulsed with an inner light.",
        "The {character} ran simulations in the lab. The {place} stretched across the viewscreen, and the {object} held the key to everything.",
    ],
    ending: &[
        "The {character} activated the {object}. The {place} transformed, reality bending to its design. A new era had begun.",
        "With the {object} now understood, the {character} transmitted their findings from the {place}. Mankind would never be the same.",
    ],
};

static COMEDY: GenreTemplates = GenreTemplates {
    opening: &[
        "A {character} walked into the {place} and somehow managed to trip over a very inconvenient {object}.",
        "The {character} had one job: deliver a {object} to the {place}. It did not go as planned.",
    ],
    middle: &[
        "Chaos ensued. The {place} became a scene of slapstick disaster as the {character} tried (and failed) to get a grip on the situation. And the {object}.",
        "Every attempt to fix things made them worse. The {character} wondered how a simple {object} in a simple {place} could cause such havoc.",
    ],
    ending: &[
        "In the end, the {character} sat in the {place}, covered in chaos, holding the {object}. At least they had a story to tell.",
        "Somehow, against all odds, the {character} succeeded. The {place} was a mess, but the {object} was exactly where it needed to be. Sort of.",
    ],
};

/// Templates for a genre.
pub fn lookup(genre: Genre) -> &'static GenreTemplates {
    match genre {
        Genre::Adventure => &ADVENTURE,
        Genre::Mystery => &MYSTERY,
        Genre::Fantasy => &FANTASY,
        Genre::SciFi => &SCI_FI,
        Genre::Comedy => &COMEDY,
    }
}

/// Templates for a genre given by name. `None` for names outside the catalog.
pub fn lookup_name(name: &str) -> Option<&'static GenreTemplates> {
    name.parse::<Genre>().ok().map(lookup)
}

/// Substitute the three placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a keyword containing a
/// placeholder token is emitted literally. Unknown `{...}` tokens are kept.
pub fn fill(template: &str, character: &str, place: &str, object: &str) -> String {
    let mut out = String::with_capacity(template.len() + character.len() + place.len() + object.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (value, token_len) = if tail.starts_with(CHARACTER) {
            (character, CHARACTER.len())
        } else if tail.starts_with(PLACE) {
            (place, PLACE.len())
        } else if tail.starts_with(OBJECT) {
            (object, OBJECT.len())
        } else {
            ("{", 1)
        };
        out.push_str(value);
        rest = &tail[token_len..];
    }
    out.push_str(rest);
    out
}

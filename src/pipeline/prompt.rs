//! Natural-language instructions for the poem and translation calls.

use crate::domain::{PoemRequest, PoemType, PollutionSummary, long_date, pollution::tier_index};

/// Register of the poem, cleanest air first. Shares its breakpoints with
/// [`crate::domain::PollutionLevel`].
const TONES: [&str; 4] = [
    "pleasing",
    "low criticism",
    "moderate and critical",
    "more critical and rough",
];

/// The word the poem must not use, spelled out so that the instruction
/// itself never contains it.
const FORBIDDEN_WORD_SPELLED: &str = "S-M-O-G";

pub const SONNET_TEMPLATE: &str = "
It should follow the traditional sonnet structure:
- 14 lines exactly.
- Lines should be in iambic pentameter (10 syllables per line with alternating unstressed and stressed syllables).
- Follows a strict rhyme scheme of ABAB CDCD EFEF GG (English or Shakespearean sonnet) or ABBA ABBA CDC DCD (Italian or Petrarchan sonnet).
- Contains a volta (turn or shift in thought) typically around line 9.
- Develops a single theme or idea, with the final couplet (in Shakespearean) or sestet (in Petrarchan) providing resolution or a new perspective.
";

pub const ODE_TEMPLATE: &str = "
It should follow the characteristics of a classical ode:
- Elevated language and formal tone.
- Addressing a specific subject directly.
- Contains stanzas of similar length and structure.
- Develops a serious theme with dignity and emotional intensity.
- Celebrates or contemplates its subject with reverence.
- Uses rich imagery and metaphors.
- Maintains a consistent, dignified rhythm.
";

pub const FREE_VERSE_TEMPLATE: &str = "
It should embody the essence of free verse:
- No fixed metrical pattern or rhyme scheme.
- Line breaks and stanza divisions based on natural speech patterns or for emphasis.
- Uses rhythm organically rather than following prescribed patterns.
- Focuses on the natural flow of language.
- May vary in line length to create emphasis or reflect content.
- Employs literary devices like imagery, metaphor, and symbolism.
- Structure supports the poem's meaning rather than following traditional forms.
";

#[must_use]
pub fn tone_for(rate: f64) -> &'static str {
    TONES[tier_index(rate)]
}

#[must_use]
pub fn form_template(poem_type: PoemType) -> &'static str {
    match poem_type {
        PoemType::Sonnet => SONNET_TEMPLATE,
        PoemType::Ode => ODE_TEMPLATE,
        PoemType::FreeVerse => FREE_VERSE_TEMPLATE,
    }
}

/// Instruction sent to the text generator for `request`.
#[must_use]
pub fn build_poem_prompt(request: &PoemRequest, summary: &PollutionSummary) -> String {
    let form = request.poem_type().name().to_lowercase();
    let city = request.city();
    let lines = request.effective_length();
    let tone = tone_for(summary.average_rate);
    let from = long_date(request.from_date());
    let to = long_date(request.to_date());

    let mut prompt = format!(
        "
Compose a {form} about {city}, reflecting on its unique atmosphere, history, and culture.
The poem must be {lines} lines long.
The poem should be inspired by the average pollution rate of {average:.2} {pollutant} recorded between {from} and {to}.
Use vivid imagery and metaphors to illustrate the city's beauty and the subtle impacts of pollution on its environment and people.
The tone of the poem should be {tone}, avoiding any overtly negative language and never using the word spelled {FORBIDDEN_WORD_SPELLED}.
Capture the essence of {city}, its resilience, and the daily life of its inhabitants in a manner that is both engaging and evocative.

Requirements:
- The poem must contain {lines} lines total
- It must follow the style conventions of a {form}
",
        average = summary.average_rate,
        pollutant = request.pollutant(),
    );
    prompt.push_str(form_template(request.poem_type()));
    prompt
}

/// Instruction for translating `text` into `target_language`.
#[must_use]
pub fn build_translation_prompt(text: &str, target_language: &str) -> String {
    format!(
        "You are a translation engine. Translate the following text into {target_language}.
Only return the translated text with the same line breaks. Do not add explanations.


Text:


{text}"
    )
}

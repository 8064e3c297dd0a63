//! Fixed global taxonomy lists restored by `seed_filters`.

use super::ad_creation_model::AdFilterCategory;

type SeedEntry = (&'static str, &'static str);

const CONCEPTS: [SeedEntry; 10] = [
    ("Problem / Solution", "Open on the pain, land on the product as the fix."),
    ("Testimonial", "A real customer tells the story in their own words."),
    ("Before / After", "Contrast life without and with the product."),
    ("Demo", "Show the product doing the job, start to finish."),
    ("Founder Story", "Why the company exists, told by the person who started it."),
    ("Comparison", "Side by side against the usual alternative."),
    ("Listicle", "A numbered set of reasons, tips or features."),
    ("Behind the Scenes", "How the product is made or the team works."),
    ("Social Proof", "Numbers, reviews and logos that signal trust."),
    ("Offer", "Lead with the deal, the discount or the bonus."),
];

const ANGLES: [SeedEntry; 10] = [
    ("Save Time", "Get hours of the week back."),
    ("Save Money", "Spend less for the same or better result."),
    ("Status", "Look and feel like the best in the room."),
    ("Fear of Missing Out", "Others are already ahead."),
    ("Simplicity", "Remove steps, tools and confusion."),
    ("Authority", "Experts and leaders already rely on it."),
    ("Health and Wellbeing", "Feel better, less stress."),
    ("Convenience", "Works wherever and whenever you are."),
    ("Identity", "Made for people like you."),
    ("Risk Reversal", "Guarantees that remove the downside."),
];

const STYLES: [SeedEntry; 10] = [
    ("UGC", "Phone-shot, native, creator-led footage."),
    ("Talking Head", "One person speaking straight to camera."),
    ("Motion Graphics", "Animated type and shapes."),
    ("Static Image", "A single image with a headline."),
    ("Carousel", "Several swipeable frames telling one story."),
    ("Screen Recording", "The product on screen, narrated."),
    ("Meme", "A familiar format with a product twist."),
    ("Interview", "Question and answer between two people."),
    ("Cinematic", "High production value, brand film look."),
    ("Text Overlay", "Bold captions carry the message over b-roll."),
];

const HOOKS: [SeedEntry; 10] = [
    ("Question", "Open with a question the viewer answers yes to."),
    ("Bold Claim", "A surprising statement that demands proof."),
    ("Statistic", "Lead with a number that stops the scroll."),
    ("Pattern Interrupt", "An unexpected visual or sound in the first second."),
    ("Call Out", "Name the audience directly."),
    ("Story Open", "Start in the middle of a moment."),
    ("Controversy", "Challenge a common belief."),
    ("Secret", "Promise to reveal something few people know."),
    ("Mistake", "Point out an error the viewer is probably making."),
    ("Result First", "Show the outcome before explaining how."),
];

/// Returns the fixed `(name, description)` list for a category.
pub fn seed_entries(category: AdFilterCategory) -> &'static [SeedEntry] {
    match category {
        AdFilterCategory::Concept => &CONCEPTS,
        AdFilterCategory::Angle => &ANGLES,
        AdFilterCategory::Style => &STYLES,
        AdFilterCategory::Hook => &HOOKS,
    }
}

//! The animation library the director may choose from, and the system
//! prompt built from it.

use std::fmt::Write;

/// One folder of the character's animation pack.
#[derive(Debug, Clone, Copy)]
pub struct AnimationCategory {
    pub name: &'static str,
    pub animations: &'static [&'static str],
}

pub const LIBRARY: &[AnimationCategory] = &[
    AnimationCategory {
        name: "faceAnimation",
        animations: &[
            "blush",
            "blush2",
            "cringe",
            "deadpan",
            "eyeRoll",
            "gasp",
            "gigaGrin",
            "grinLaughing",
            "mindBlown",
            "moneyEye",
            "pleading",
            "rage",
            "rage2",
            "side-eye",
            "smirk",
            "surprise",
            "suspicious",
            "sweat",
            "uglyCry",
            "villain-grin",
        ],
    },
    AnimationCategory {
        name: "indianDances",
        animations: &[
            "classicalDance",
            "indianDance2",
            "panjabaiDance2",
            "panjabiDance",
            "panjabiNew",
            "panjabiNew2",
            "rrrDance",
            "rrrDance1",
            "rrrDance2",
            "rrrDance3",
            "thumka",
            "thumka2",
            "vickyKaushalDance",
            "vickyKaushalDance2",
        ],
    },
    AnimationCategory {
        name: "memeBeats",
        animations: &[
            "dramaticCollapse",
            "faint",
            "headBang",
            "Kneel",
            "moonwalk",
            "stomp",
            "tipToe",
            "Tpose",
            "victoryJump",
        ],
    },
    AnimationCategory {
        name: "UpperBodyBits",
        animations: &[
            "airQuotes",
            "backFlipCartwheel",
            "claping",
            "claping2",
            "dab",
            "DanceWithMicrophone",
            "facepalm",
            "facepalmBothHand",
            "fingerWag",
            "fistPump",
            "foreheadWipe",
            "hands on hips",
            "jazz hands",
            "micDrop",
            "point",
            "point2",
            "pointDouble",
            "rapping",
            "shrug",
            "strut2",
        ],
    },
    AnimationCategory {
        name: "general",
        animations: &[
            "angereffect",
            "aura farmer",
            "backFlip",
            "ballDribling",
            "ball kick",
            "block",
            "blockCrouch",
            "busketball",
            "busketBallThrow",
            "catchRun",
            "catchRun2",
            "chefsKiss",
            "comeHere",
            "crawl",
            "crawlBackwards",
            "cryingeffect",
            "dance",
            "dance2",
            "danceEmote",
            "duck",
            "eat",
            "embarrassed",
            "fairyFly",
            "fairyFlyWithwandWave",
            "fallPose",
            "fallPose2",
            "flyHorizontalSuperman",
            "flySuperman",
            "Hadokun",
            "hardHit",
            "hip Twist",
            "idle",
            "jump",
            "jumpInplace",
            "kick",
            "kickingBallWithLeft",
            "KickingBallWithRight",
            "kickJumping",
            "kickSitting",
            "kickSitting2",
            "knockOver",
            "laughing2",
            "laughingEffect",
            "leaningforward",
            "lightHit",
            "moneySplash",
            "moneyThrow",
            "punchJumping",
            "punch jumping",
            "punchJumpingInplace",
            "punchLeftHook",
            "punchRightHook",
            "punchSitting",
            "recover",
            "run",
            "runBackwards",
            "scaredRun",
            "scaredRun2",
            "sleeping",
            "sleepStanding",
            "surprise",
            "talkingeffect",
            "twerk",
            "upperCut",
            "walk",
            "walkBackwards",
        ],
    },
];

/// Every animation name, in library order. Names listed in two categories
/// appear twice.
pub fn animation_names() -> impl Iterator<Item = &'static str> {
    LIBRARY.iter().flat_map(|c| c.animations.iter().copied())
}

const GUIDELINES: &str = r#"Guidelines:
- Understand the user's text emotionally and contextually.
- Choose animations that fit the vibe and context.
- Keep ordered_sequence between 3-6 animations that tell a story with a beginning, middle, and end.
- Set "vibe" to match the emotional tone (e.g., sad for "i hate my life", silly for "twerking").
- Set "control_suggestion":
  * "auto" = animations play automatically in sequence (default for most story-based prompts)
  * "movement" = user controls walking/running/jumping during the sequence
  * "button:ACTION" = create a clickable button to trigger ACTION (e.g., "button:twerk" for "donald trump twerking")
  * "interactive" = create buttons for multiple actions the user can choose (e.g., "dance challenge")
- For story-based prompts with movement (like "went to work", "walking somewhere"), include walk/run animations at the start.
- For dramatic endings, include impactful final animations (like micDrop, faint, victoryJump, dramaticCollapse).
- Mix animation types to tell better stories: movement (walk, run) + emotion (face animations) + action (micDrop, dance).
- For prompts about specific actions (like "twerking", "dancing with button"), suggest button-based control.
- For challenges or selections (like "dance challenge"), use "interactive" mode.
- Be coherent, funny, and expressive.
- If unsure, default to ordered_sequence: ['idle'], vibe: "neutral", control_suggestion: "auto".
- Never output plain text, only JSON."#;

const RESPONSE_FORMAT: &str = r#"You are an animation director that converts free-text prompts into short, funny animation sequences.

You must always respond in JSON format with this structure:
{
    "inferred_mechanic": "<string, e.g. dance, run, cry, fight, idle>",
    "animation_candidates": [<list of related animations>],
    "ordered_sequence": [<3-6 animation names that make narrative sense>],
    "vibe": "<emotional tone: happy, sad, angry, excited, neutral, silly, dramatic>",
    "control_suggestion": "<control type: auto, movement, button:ACTION, or interactive>"
}
"#;

/// Instructions sent as the system message of every completion.
pub fn system_prompt() -> String {
    let names: Vec<&str> = animation_names().collect();
    let mut prompt = String::from(RESPONSE_FORMAT);
    let _ = write!(prompt, "\nAvailable animations:\n{}\n\n{GUIDELINES}", names.join(", "));
    prompt
}

//! Image prompt construction.

use crate::weather::{ImageStyle, WeatherCondition, WeatherState};

const ISOMETRIC_SCENE: &str = "A highly detailed isometric 3D diorama mini-world. Tilted top-down view (approx 45 degrees). Style: Toy-like realism, smooth shading, 3D-rendered diorama art. Composition: A miniature city block on a square platform with distinct edges, water channels or roads, and recognizable landmarks. Colors: Vibrant but cohesive, soft textures. Lighting: Soft ambient lighting, diffuse shadows. Render: Octane render quality, smooth textures, SimCity-style aesthetic, high resolution, clean outlines.";

const REALISTIC_SCENE: &str = "A breathtaking, photorealistic 8k cinematic shot. Highly detailed, atmospheric lighting, resembling National Geographic photography. Darker, dramatic mood.";

const CARTOONISH_SCENE: &str = "A cute, vibrant, stylized 3D render in the style of high-end animation (like Pixar or Animal Crossing). Soft round shapes, bright cheerful colors, toy-like textures. Light and airy background.";

const CYBERPUNK_SCENE: &str = "A futuristic, neon-drenched cyberpunk vision. Glowing lights, dark moody atmosphere, holographic elements, high-tech architecture. Night time setting.";

const RAIN_ATMOSPHERE: &str = "Wet roads, slight reflections, grey-blue mist, rain streaks";
const SUNNY_ATMOSPHERE: &str = "Bright soft sunlight, distinct shadows";
const DEFAULT_ATMOSPHERE: &str = "Atmospheric fog or clouds";

const LIGHT_BACKGROUND: &str = "Clean, solid soft grey-blue or neutral light background to contrast with dark text overlay.";
const ATMOSPHERIC_BACKGROUND: &str = "Atmospheric background matching the scene.";

/// Directives appended to every image request.
pub const IMAGE_DIRECTIVES: &str = "Important: No text on the image. High fidelity, 8k resolution.";

/// Scene description for a style.
pub fn style_scene(style: ImageStyle) -> &'static str {
    match style {
        ImageStyle::Realistic => REALISTIC_SCENE,
        ImageStyle::Cartoonish => CARTOONISH_SCENE,
        ImageStyle::Cyberpunk => CYBERPUNK_SCENE,
        ImageStyle::Isometric => ISOMETRIC_SCENE,
    }
}

/// Atmosphere clause for a condition.
pub fn atmosphere(condition: WeatherCondition) -> &'static str {
    match condition {
        WeatherCondition::Rain => RAIN_ATMOSPHERE,
        WeatherCondition::Sunny => SUNNY_ATMOSPHERE,
        _ => DEFAULT_ATMOSPHERE,
    }
}

/// Background clause for a style.
pub fn background(style: ImageStyle) -> &'static str {
    if style.is_light() {
        LIGHT_BACKGROUND
    } else {
        ATMOSPHERIC_BACKGROUND
    }
}

/// Builds the scene prompt for a weather state.
pub fn scene_prompt(state: &WeatherState) -> String {
    let city = &state.city;
    format!(
        "{scene}\n\
         Subject: The city of {city}.\n\
         Weather Condition: {condition}.\n\
         Details: Features iconic landmarks of {city} (e.g. towers, temples, bridges) arranged in a miniature scene.\n\
         Atmosphere: Match the weather: {atmosphere}.\n\
         Background: {background}",
        scene = style_scene(state.style),
        condition = state.condition,
        atmosphere = atmosphere(state.condition),
        background = background(state.style),
    )
}

/// Builds the full prompt sent to the image model.
pub fn image_prompt(state: &WeatherState) -> String {
    format!("{}\n{IMAGE_DIRECTIVES}", scene_prompt(state))
}

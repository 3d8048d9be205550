/// Vega-Lite encoding channel for a Vega mark property.
///
/// Range properties collapse onto their spatial channel, and both paint properties map to
/// `color`. Any other property is its own channel.
pub fn channel_name(property: &str) -> &str {
    match property {
        "x" | "x+" | "x2" | "width" => "x",
        "y" | "y+" | "y2" | "height" => "y",
        "fill" | "stroke" => "color",
        _ => property,
    }
}

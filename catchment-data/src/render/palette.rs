//! Chain to colour mapping.

use std::collections::HashMap;

/// Colours handed out to chains without an explicit colour.
pub const DEFAULT_COLOURS: [&str; 8] = [
    "green",
    "red",
    "orange",
    "blue",
    "purple",
    "darkred",
    "cadetblue",
    "darkgreen",
];

/// Display colour per chain, keyed by lowercased chain name.
///
/// Chains are paired with colours by position. Chains left over once the
/// explicit colours run out take [`DEFAULT_COLOURS`] in turn.
///
/// # Examples
///
/// ```
/// use catchment_data::ChainPalette;
///
/// let palette = ChainPalette::new(["Countdown", "New World"], ["#007837"]);
/// assert_eq!(palette.colour_for("countdown"), "#007837");
/// assert_eq!(palette.colour_for("new world"), "red");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainPalette {
    colours: HashMap<String, String>,
}

impl ChainPalette {
    /// Zip `chains` with `colours`, keyed by the lowercased chain name the
    /// matcher reports.
    pub fn new<C, K>(chains: C, colours: K) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let mut explicit = colours.into_iter().map(Into::into);
        let colours = chains
            .into_iter()
            .enumerate()
            .map(|(index, chain)| {
                let colour = explicit
                    .next()
                    .unwrap_or_else(|| default_colour(index).to_owned());
                (chain.as_ref().to_lowercase(), colour)
            })
            .collect();
        Self { colours }
    }

    /// Colour for `chain`, falling back to the first default colour for
    /// chains the palette does not know.
    pub fn colour_for(&self, chain: &str) -> &str {
        self.colours
            .get(chain)
            .map_or(DEFAULT_COLOURS[0], String::as_str)
    }
}

fn default_colour(index: usize) -> &'static str {
    DEFAULT_COLOURS
        .get(index % DEFAULT_COLOURS.len())
        .copied()
        .unwrap_or("gray")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pairs_chains_with_colours_by_position() {
        let palette = ChainPalette::new(
            ["Countdown", "New World", "Pak'nSave"],
            ["green", "red", "yellow"],
        );

        assert_eq!(palette.colour_for("countdown"), "green");
        assert_eq!(palette.colour_for("new world"), "red");
        assert_eq!(palette.colour_for("pak'nsave"), "yellow");
    }

    #[rstest]
    #[case(0, "green")]
    #[case(1, "red")]
    #[case(8, "green")]
    #[case(9, "red")]
    fn default_colours_cycle(#[case] index: usize, #[case] expected: &str) {
        assert_eq!(default_colour(index), expected);
    }

    #[rstest]
    fn unknown_chain_uses_first_default() {
        let palette = ChainPalette::new(["Countdown"], ["#007837"]);

        assert_eq!(palette.colour_for("four square"), "green");
    }

    #[rstest]
    fn surplus_colours_are_ignored() {
        let palette = ChainPalette::new(["Countdown"], ["green", "red"]);

        assert_eq!(palette.colour_for("countdown"), "green");
        assert_eq!(palette.colour_for("red"), "green");
    }

    #[rstest]
    fn keys_follow_the_matcher_lowercasing() {
        let palette = ChainPalette::new(["World ", "Countdown"], ["blue", "green"]);

        assert_eq!(palette.colour_for("world "), "blue");
        assert_eq!(palette.colour_for("countdown"), "green");
    }
}

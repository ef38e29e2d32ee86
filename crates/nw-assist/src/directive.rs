//! Prompt directives.
//!
//! A directive anywhere in a prompt asks the collaborator to generate assets
//! instead of answering a question:
//!
//! - `@image`, `@<n>image` → `n` image assets (missing or zero count means 1,
//!   capped at [`MAX_IMAGES`])
//! - `@3d` → one 3D asset
//!
//! An image directive anywhere in the prompt takes precedence over `@3d`;
//! among directives of the same kind the first one wins.

use winnow::combinator::preceded;
use winnow::prelude::*;
use winnow::token::take_while;

/// Upper bound on images generated by a single prompt.
pub const MAX_IMAGES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Images(usize),
    Model3d,
}

/// Scan `prompt` for a directive, images first.
pub fn find_directive(prompt: &str) -> Option<Directive> {
    scan(prompt, parse_images).or_else(|| scan(prompt, parse_model3d))
}

/// First `@` in `prompt` at which `parser` succeeds.
fn scan(prompt: &str, parser: fn(&mut &str) -> ModalResult<Directive>) -> Option<Directive> {
    prompt.match_indices('@').find_map(|(at, _)| {
        let mut rest = &prompt[at..];
        preceded('@', parser).parse_next(&mut rest).ok()
    })
}

fn parse_model3d(input: &mut &str) -> ModalResult<Directive> {
    "3d".value(Directive::Model3d).parse_next(input)
}

fn parse_images(input: &mut &str) -> ModalResult<Directive> {
    let digits: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    "image".parse_next(input)?;
    Ok(Directive::Images(image_count(digits)))
}

fn image_count(digits: &str) -> usize {
    if digits.is_empty() {
        return 1;
    }
    // Overflowing counts saturate to the cap.
    let n = digits.parse::<u64>().unwrap_or(u64::MAX);
    n.clamp(1, MAX_IMAGES as u64) as usize
}

//! Named transition presets for the landing sequence, staggered reveals and
//! the lightbox. The stylesheet reads these through CSS custom properties.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseOut,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub fn css(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::EaseOut => "ease-out".to_string(),
            Easing::CubicBezier(a, b, c, d) => format!("cubic-bezier({a}, {b}, {c}, {d})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub delay_ms: u32,
    pub duration_ms: u32,
    /// Extra delay per item when applied to a list
    pub stagger_ms: u32,
    /// Starting vertical offset the element rises from
    pub offset_y_px: u32,
    pub easing: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// One character of the landing name
    TypewriterStep,
    /// Pause after the name is fully typed
    TypewriterHold,
    /// Name sliding from screen centre to the header
    HeaderSlide,
    ContainerReveal,
    ItemReveal,
    NavbarReveal,
    NavItemReveal,
    LightboxBackdrop,
    LightboxPanel,
    CursorBlink,
}

impl Transition {
    pub const ALL: [Transition; 10] = [
        Transition::TypewriterStep,
        Transition::TypewriterHold,
        Transition::HeaderSlide,
        Transition::ContainerReveal,
        Transition::ItemReveal,
        Transition::NavbarReveal,
        Transition::NavItemReveal,
        Transition::LightboxBackdrop,
        Transition::LightboxPanel,
        Transition::CursorBlink,
    ];

    pub fn spec(self) -> TransitionSpec {
        let base = TransitionSpec {
            delay_ms: 0,
            duration_ms: 0,
            stagger_ms: 0,
            offset_y_px: 0,
            easing: Easing::EaseOut,
        };
        match self {
            Transition::TypewriterStep => TransitionSpec {
                duration_ms: 150,
                easing: Easing::Linear,
                ..base
            },
            Transition::TypewriterHold => TransitionSpec {
                duration_ms: 800,
                easing: Easing::Linear,
                ..base
            },
            Transition::HeaderSlide => TransitionSpec {
                duration_ms: 1200,
                easing: Easing::CubicBezier(0.19, 1.0, 0.22, 1.0),
                ..base
            },
            Transition::ContainerReveal => TransitionSpec {
                delay_ms: 300,
                duration_ms: 300,
                stagger_ms: 200,
                ..base
            },
            Transition::ItemReveal => TransitionSpec {
                duration_ms: 500,
                offset_y_px: 20,
                ..base
            },
            Transition::NavbarReveal => TransitionSpec {
                delay_ms: 1200,
                duration_ms: 600,
                stagger_ms: 100,
                ..base
            },
            Transition::NavItemReveal => TransitionSpec {
                duration_ms: 500,
                offset_y_px: 20,
                ..base
            },
            Transition::LightboxBackdrop => TransitionSpec {
                duration_ms: 300,
                ..base
            },
            Transition::LightboxPanel => TransitionSpec {
                duration_ms: 300,
                offset_y_px: 20,
                ..base
            },
            Transition::CursorBlink => TransitionSpec {
                duration_ms: 700,
                easing: Easing::Linear,
                ..base
            },
        }
    }

    /// CSS custom-property stem, e.g. `header-slide`
    pub fn css_name(self) -> &'static str {
        match self {
            Transition::TypewriterStep => "typewriter-step",
            Transition::TypewriterHold => "typewriter-hold",
            Transition::HeaderSlide => "header-slide",
            Transition::ContainerReveal => "container-reveal",
            Transition::ItemReveal => "item-reveal",
            Transition::NavbarReveal => "navbar-reveal",
            Transition::NavItemReveal => "nav-item-reveal",
            Transition::LightboxBackdrop => "lightbox-backdrop",
            Transition::LightboxPanel => "lightbox-panel",
            Transition::CursorBlink => "cursor-blink",
        }
    }
}

/// Delay for the `index`-th element of a staggered list.
pub fn stagger_delay_ms(transition: Transition, index: usize) -> u32 {
    let spec = transition.spec();
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    spec.delay_ms
        .saturating_add(spec.stagger_ms.saturating_mul(index))
}

/// Reveal delay of each character of the landing name.
pub fn typewriter_schedule(name: &str) -> Vec<(char, u32)> {
    let step = Transition::TypewriterStep.spec().duration_ms;
    name.chars()
        .zip((1u32..).map(|i| i.saturating_mul(step)))
        .collect()
}

/// Time from first paint until the header has settled and the page content
/// starts revealing.
pub fn landing_duration_ms(name: &str) -> u32 {
    let chars = u32::try_from(name.chars().count()).unwrap_or(u32::MAX);
    Transition::TypewriterStep
        .spec()
        .duration_ms
        .saturating_mul(chars)
        .saturating_add(Transition::TypewriterHold.spec().duration_ms)
        .saturating_add(Transition::HeaderSlide.spec().duration_ms)
}

/// `:root` block exposing every preset as CSS custom properties.
pub fn css_variables() -> String {
    let mut css = String::from(":root {\n");
    for transition in Transition::ALL {
        let spec = transition.spec();
        let name = transition.css_name();
        let _ = writeln!(css, "  --{name}-delay: {}ms;", spec.delay_ms);
        let _ = writeln!(css, "  --{name}-duration: {}ms;", spec.duration_ms);
        let _ = writeln!(css, "  --{name}-stagger: {}ms;", spec.stagger_ms);
        let _ = writeln!(css, "  --{name}-offset: {}px;", spec.offset_y_px);
        let _ = writeln!(css, "  --{name}-easing: {};", spec.easing.css());
    }
    css.push('}');
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typewriter_schedule() {
        let schedule = typewriter_schedule("GJ");
        assert_eq!(schedule, vec![('G', 150), ('J', 300)]);
        assert!(typewriter_schedule("").is_empty());
    }

    #[test]
    fn test_landing_duration() {
        // 12 characters, hold, slide
        assert_eq!(landing_duration_ms("GREG JOBLOVE"), 12 * 150 + 800 + 1200);
    }

    #[test]
    fn test_stagger() {
        assert_eq!(stagger_delay_ms(Transition::ContainerReveal, 0), 300);
        assert_eq!(stagger_delay_ms(Transition::ContainerReveal, 3), 900);
        assert_eq!(stagger_delay_ms(Transition::NavbarReveal, 2), 1400);
        assert_eq!(stagger_delay_ms(Transition::ItemReveal, 5), 0);
    }

    #[test]
    fn test_css_variables_cover_every_preset() {
        let css = css_variables();
        for transition in Transition::ALL {
            assert!(css.contains(&format!("--{}-duration", transition.css_name())));
        }
        assert!(css.contains("--header-slide-easing: cubic-bezier(0.19, 1, 0.22, 1);"));
        assert!(css.starts_with(":root {"));
    }
}

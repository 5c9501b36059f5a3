//! Theme override stylesheet.

use crate::palette::Palette;

/// Build the stylesheet that re-colors a page and drives its background animation.
pub fn theme_override_css(palette: &Palette, speed_secs: u32) -> String {
    format!(
        r#":root {{
  --bg-dark: {bg0};
  --bg-gradient: linear-gradient(135deg, {bg1} 0%, {bg0} 50%, {bg2} 100%);
  --accent: {accent};
  --accent-hover: {hover};
}}
body {{ background: var(--bg-dark) !important; }}
.fixed-bg {{ background: var(--bg-gradient) !important; }}
.fixed-bg:before {{
  background:
    radial-gradient(circle at 18% 26%, {glow1} 0%, transparent 36%),
    radial-gradient(circle at 82% 16%, {glow2} 0%, transparent 40%),
    radial-gradient(circle at 50% 76%, {glow3} 0%, transparent 42%) !important;
  background-size: 220% 220% !important;
  animation: shift {speed}s ease infinite !important;
  will-change: background-position;
}}
@keyframes shift {{ 0%, 100% {{ background-position: 0% 50%; }} 50% {{ background-position: 100% 50%; }} }}
"#,
        bg0 = palette.background0,
        bg1 = palette.background1,
        bg2 = palette.background2,
        accent = palette.accent,
        hover = palette.accent_hover,
        glow1 = palette.glow1,
        glow2 = palette.glow2,
        glow3 = palette.glow3,
        speed = speed_secs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_palette_and_speed() {
        let css = theme_override_css(&Palette::wine(), 21);

        assert!(css.contains("--bg-dark: #12070c;"));
        assert!(css.contains("--accent: #b63a5a;"));
        assert!(css.contains("rgba(113,16,57,0.62)"));
        assert!(css.contains("animation: shift 21s ease infinite"));
    }
}

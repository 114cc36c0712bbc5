//! Theme - UI テーマの設定値
//!
//! 描画はこのクレートの外。ここでは provider に渡す値だけを持つ。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub color_scheme: ColorScheme,
    pub font_family: String,
    pub with_global_styles: bool,
    pub with_normalize_css: bool,
}

impl Theme {
    /// アプリケーション既定のダークテーマ
    pub fn dark() -> Self {
        Self {
            color_scheme: ColorScheme::Dark,
            font_family: "Verdata, sans-serif".to_string(),
            with_global_styles: true,
            with_normalize_css: true,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

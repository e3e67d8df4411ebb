use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// ColorBrewer YlOrRd，9 階
pub const YL_OR_RD_9: [Rgb; 9] = [
    Rgb(0xff, 0xff, 0xcc),
    Rgb(0xff, 0xed, 0xa0),
    Rgb(0xfe, 0xd9, 0x76),
    Rgb(0xfe, 0xb2, 0x4c),
    Rgb(0xfd, 0x8d, 0x3c),
    Rgb(0xfc, 0x4e, 0x2a),
    Rgb(0xe3, 0x1a, 0x1c),
    Rgb(0xbd, 0x00, 0x26),
    Rgb(0x80, 0x00, 0x26),
];

/// 在 `[min, max]` 上等距分布 YlOrRd 色階並線性內插的連續色階
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    stops: &'static [Rgb],
}

impl ColorScale {
    /// 色階固定為非空的 YL_OR_RD_9
    fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            stops: &YL_OR_RD_9,
        }
    }

    /// 以資料的最小、最大值作為值域；沒有任何有限數值時回傳 None
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new(min, max))
    }

    pub fn stops(&self) -> &[Rgb] {
        self.stops
    }

    /// min == max 時整層使用單一顏色
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// 值域退化時使用的顏色：色階中間那一階
    pub fn fallback(&self) -> Rgb {
        self.stops[self.stops.len() / 2]
    }
}

/// 依色階計算填色。超出值域的值會被夾在兩端，NaN 與退化的值域使用 fallback
pub fn fill_color(value: f64, scale: &ColorScale) -> Rgb {
    let stops = scale.stops();
    if stops.len() == 1 || scale.is_degenerate() || !value.is_finite() {
        return scale.fallback();
    }

    let t = ((value - scale.min) / (scale.max - scale.min)).clamp(0.0, 1.0);
    let position = t * (stops.len() - 1) as f64;
    let lower = position.floor() as usize;
    if lower >= stops.len() - 1 {
        return stops[stops.len() - 1];
    }

    let fraction = position - lower as f64;
    let (a, b) = (stops[lower], stops[lower + 1]);
    Rgb(
        lerp(a.0, b.0, fraction),
        lerp(a.1, b.1, fraction),
        lerp(a.2, b.2, fraction),
    )
}

fn lerp(a: u8, b: u8, fraction: f64) -> u8 {
    let value = f64::from(a) + (f64::from(b) - f64::from(a)) * fraction;
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_domain_from_values() {
        let scale = ColorScale::from_values([675.0, 720.0, f64::NAN, 300.0]).unwrap();
        assert_eq!(scale.min, 300.0);
        assert_eq!(scale.max, 720.0);
        assert!(ColorScale::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_endpoints_hit_first_and_last_stop() {
        let scale = ColorScale::new(50.0, 60.0);
        assert_eq!(fill_color(50.0, &scale), YL_OR_RD_9[0]);
        assert_eq!(fill_color(60.0, &scale), YL_OR_RD_9[8]);
        assert_eq!(fill_color(60.0, &scale).to_hex(), "#800026");
    }

    #[test]
    fn test_interpolates_between_stops() {
        let scale = ColorScale::new(0.0, 8.0);
        assert_eq!(fill_color(4.0, &scale), YL_OR_RD_9[4]);
        // ffffcc 與 ffeda0 的中點
        assert_eq!(fill_color(0.5, &scale), Rgb(0xff, 0xf6, 0xb6));
    }

    #[test]
    fn test_out_of_domain_values_clamp() {
        let scale = ColorScale::new(10.0, 20.0);
        assert_eq!(fill_color(-5.0, &scale), YL_OR_RD_9[0]);
        assert_eq!(fill_color(500.0, &scale), YL_OR_RD_9[8]);
    }

    #[test]
    fn test_scale_always_has_stops() {
        let scale = ColorScale::from_values([3.0]).unwrap();
        assert_eq!(scale.stops(), &YL_OR_RD_9[..]);
        assert_eq!(fill_color(f64::NAN, &scale), YL_OR_RD_9[4]);
    }

    #[test]
    fn test_degenerate_domain_uses_uniform_fallback() {
        let scale = ColorScale::from_values([1.0, 1.0]).unwrap();
        assert!(scale.is_degenerate());
        assert_eq!(fill_color(1.0, &scale), YL_OR_RD_9[4]);
        assert_eq!(fill_color(1.0, &scale), scale.fallback());
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Premultiplied source-over: `out = src + dst * (1 - src.a)`.
pub(crate) fn premul_over_px(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa;
    [
        add_sat_u8(src[0], mul_div255_u8(u16::from(dst[0]), inv)),
        add_sat_u8(src[1], mul_div255_u8(u16::from(dst[1]), inv)),
        add_sat_u8(src[2], mul_div255_u8(u16::from(dst[2]), inv)),
        add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv)),
    ]
}

/// 7-bit MIDI velocity to the 0..1 range the AA runtime expects.
#[inline]
pub fn velocity_to_unit(velocity: u8) -> f32 {
    f32::from(velocity.min(127)) / 127.0
}

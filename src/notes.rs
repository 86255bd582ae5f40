// Note names to equal-tempered frequencies (A4 = 440 Hz), rounded to whole Hz.
// Names are a letter A-G (either case), an optional '#' or 'b', and an octave 0-8.

const A4_HZ: f64 = 440.0;
const A4_INDEX: i32 = 4 * 12 + 9; // semitones above C0

pub fn frequency(name: &str) -> Option<u32> {
    let mut chars = name.trim().chars();
    let semitone = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest: Vec<char> = chars.collect();
    let (shift, octave) = match rest.as_slice() {
        [octave] => (0, *octave),
        ['#', octave] => (1, *octave),
        ['b' | 'B', octave] => (-1, *octave),
        _ => return None,
    };
    let octave = octave.to_digit(10).filter(|&o| o <= 8)? as i32;

    let index = octave * 12 + semitone + shift;
    Some((A4_HZ * 2f64.powf((index - A4_INDEX) as f64 / 12.0)).round() as u32)
}

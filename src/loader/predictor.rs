//! Reversal of the TIFF differencing predictors

/// Undoes horizontal differencing (predictor 2) on one chunk of sample words
///
/// Each sample is stored as the difference to the same sample of the
/// previous pixel, so the running sum uses a stride of `samples_per_pixel`.
/// Sums wrap at the sample width.
pub fn undo_horizontal(words: &mut [u64], row_samples: usize, samples_per_pixel: usize, bits: u16) {
    let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };

    for row in words.chunks_mut(row_samples) {
        for i in samples_per_pixel..row.len() {
            row[i] = row[i].wrapping_add(row[i - samples_per_pixel]) & mask;
        }
    }
}

/// Undoes the floating-point predictor (predictor 3) and returns sample words
///
/// Rows hold byte-differenced data laid out as byte planes, most
/// significant plane first, independent of the file byte order.
pub fn undo_floating_point(bytes: &mut [u8], row_samples: usize, samples_per_pixel: usize,
                           bytes_per_sample: usize) -> Vec<u64> {
    let row_bytes = row_samples * bytes_per_sample;
    let mut words = Vec::with_capacity(bytes.len() / bytes_per_sample.max(1));

    for row in bytes.chunks_mut(row_bytes) {
        for i in samples_per_pixel..row.len() {
            row[i] = row[i].wrapping_add(row[i - samples_per_pixel]);
        }

        let samples_in_row = row.len() / bytes_per_sample;
        for sample in 0..samples_in_row {
            let word = (0..bytes_per_sample)
                .fold(0u64, |acc, plane| (acc << 8) | row[plane * samples_in_row + sample] as u64);
            words.push(word);
        }
    }

    words
}

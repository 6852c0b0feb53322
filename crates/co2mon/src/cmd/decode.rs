use co2mon_frame::{plaintext, RawFrame, Reading, Record, FRAME_SIZE};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = parse_frame(&args.frame.join(""))?;
    let (plain, encoding) = plaintext(&wire).map_err(|err| frame_error("decode failed", err))?;

    let record = Record::from_plaintext(&plain);
    let reading = Reading::from_record(&record);
    print_decoded(&wire, &plain, encoding, record.value, &reading, format);

    Ok(SUCCESS)
}

fn parse_frame(input: &str) -> CliResult<RawFrame> {
    let digits: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '-'))
        .collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);

    if digits.len() != FRAME_SIZE * 2 {
        return Err(CliError::new(
            USAGE,
            format!(
                "frame must be exactly {FRAME_SIZE} bytes ({} hex digits), got {} digits",
                FRAME_SIZE * 2,
                digits.len()
            ),
        ));
    }

    let mut frame = [0u8; FRAME_SIZE];
    for (i, byte) in frame.iter_mut().enumerate() {
        let pair = digits
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| CliError::new(USAGE, "frame must be ASCII hex"))?;
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| CliError::new(USAGE, format!("invalid hex byte: {pair}")))?;
    }
    Ok(frame)
}

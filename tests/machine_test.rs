//! Whole-machine behaviour: program images running through `step()`,
//! shutdown conditions and the permissive handling of junk words.

use cosmac8::interpreter::{Fault, Machine};
use cosmac8::memory::{RomTooLarge, MAX_PROGRAM_LEN};

fn machine_with(image: &[u8]) -> Machine {
    let mut m = Machine::with_seed(7);
    m.load_program(image).unwrap();
    m
}

#[test]
fn test_add_then_spin() {
    // V0 = 5, V0 += 3, then jump-to-self at 0x204
    let mut m = machine_with(&[0x60, 0x05, 0x70, 0x03, 0x12, 0x04]);
    for _ in 0..3 {
        m.step().unwrap();
    }
    assert_eq!(m.v(0), 8);
    assert_eq!(m.pc(), 0x204);
    // parked on the jump: more steps change nothing
    for _ in 0..3 {
        m.step().unwrap();
    }
    assert_eq!(m.v(0), 8);
    assert_eq!(m.pc(), 0x204);
}

#[test]
fn test_clear_screen_blanks_everything() {
    let mut m = machine_with(&[0x00, 0xe0]);
    m.framebuffer_mut().draw_sprite(10, 10, &[0xff, 0xff]);
    m.framebuffer_mut().draw_sprite(60, 30, &[0xff]);
    m.step().unwrap();
    let grid = m.framebuffer().snapshot();
    assert!(grid.iter().all(|row| row.iter().all(|&px| !px)));
}

#[test]
fn test_oversized_image_is_rejected() {
    let mut m = Machine::with_seed(7);
    assert_eq!(
        m.load_program(&[0; MAX_PROGRAM_LEN + 1]),
        Err(RomTooLarge(MAX_PROGRAM_LEN + 1))
    );
    // exactly full is fine
    m.load_program(&[0; MAX_PROGRAM_LEN]).unwrap();
}

#[test]
fn test_execution_falls_off_the_image() {
    // jump to 0xffe: the word there is zeroes (skipped as unknown), then
    // the PC sits past the last cell and the next fetch faults
    let mut m = machine_with(&[0x1f, 0xfe]);
    m.step().unwrap();
    m.step().unwrap();
    assert_eq!(m.decode_faults(), 1);
    assert_eq!(m.step(), Err(Fault::FetchOutOfBounds { pc: 0x1000 }));
}

#[test]
fn test_junk_words_do_not_stop_the_machine() {
    let mut m = machine_with(&[0x08, 0x15, 0xe0, 0x00, 0xff, 0x00, 0x60, 0x2a]);
    for _ in 0..4 {
        m.step().unwrap();
    }
    assert_eq!(m.decode_faults(), 3);
    assert_eq!(m.v(0), 0x2a);
    assert_eq!(m.pc(), 0x208);
}

#[test]
fn test_wait_key_then_draw_resumes_cleanly() {
    // wait for a key, then draw its glyph at (0,0)
    let mut m = machine_with(&[
        0xf0, 0x0a, // V0 = awaited key
        0xf0, 0x29, // I = glyph address
        0x61, 0x00, // V1 = 0
        0xd1, 0x15, // draw 5 rows
    ]);
    m.step().unwrap();
    assert!(m.awaiting_key());

    // host loop keeps stepping while the program waits
    for _ in 0..5 {
        m.step().unwrap();
    }
    assert_eq!(m.pc(), 0x202);

    m.keypad_mut().set_key(0x1, true);
    m.step().unwrap(); // wait completes
    assert!(!m.awaiting_key());
    assert_eq!(m.v(0), 0x1);

    for _ in 0..3 {
        m.step().unwrap();
    }
    // top row of the '1' glyph is 0x20: a single pixel at x=2
    assert!(m.framebuffer().pixel(2, 0));
    assert!(!m.framebuffer().pixel(0, 0));
    assert_eq!(m.pc(), 0x208);
}

#[test]
fn test_call_return_preserves_registers_across_subroutine() {
    let mut m = machine_with(&[
        0x60, 0x01, // V0 = 1
        0x22, 0x08, // call 0x208
        0x70, 0x01, // V0 += 1 after return
        0x12, 0x06, // spin
        0x61, 0x63, // subroutine: V1 = 99
        0x00, 0xee, // return
    ]);
    for _ in 0..5 {
        m.step().unwrap();
    }
    assert_eq!(m.v(0), 2);
    assert_eq!(m.v(1), 99);
    assert_eq!(m.sp(), 0);
    assert_eq!(m.pc(), 0x206);
}

#[test]
fn test_delay_loop_counts_host_ticks() {
    // the classic wait idiom: V0 = 2 into the delay timer, then spin on
    // fx07 until it reads zero
    let mut m = machine_with(&[
        0x60, 0x02, // V0 = 2
        0xf0, 0x15, // delay = V0
        0xf1, 0x07, // V1 = delay
        0x31, 0x00, // skip if V1 == 0
        0x12, 0x04, // back to the read
        0x12, 0x0a, // done: spin here
    ]);
    // no host ticks yet: the loop keeps reading a nonzero timer
    for _ in 0..8 {
        m.step().unwrap();
    }
    assert_ne!(m.pc(), 0x20a);

    m.timers_mut().tick();
    m.timers_mut().tick();
    for _ in 0..8 {
        m.step().unwrap();
    }
    assert_eq!(m.pc(), 0x20a);
    assert_eq!(m.v(1), 0);
}

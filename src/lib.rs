//!
//! ## Design
//!
//! * one `Machine` value owns every piece of state a program can touch:
//!   registers, call stack, memory, framebuffer, timers, keypad
//! * the interpreter core knows nothing about terminals; the host ring
//!   (screen, input, sound, pacing) talks to it through narrow traits so
//!   alternative front ends can be plugged in
//! * instruction words decode once into a closed enum, then dispatch with
//!   an exhaustive match
//! * two cadences, both driven by the host: `step()` at the configured
//!   instruction rate (700Hz unless asked otherwise), timers/frames at 60Hz
//! * the wait-for-key instruction parks the machine in a resumable state
//!   rather than blocking, so the host keeps polling input and presenting
//!   frames while a program sits on fx0a
//!
//! Model
//!
//! host (main)
//!  |-- screen, input, sound
//!  |-- machine
//!  |    |-- memory (font + program regions)
//!  |    |-- framebuffer (xor draw, collision, dirty flag)
//!  |    |-- timers (delay, sound)
//!  |    `-- keypad (16 keys + key-down edge latch)
//!  `-- main loop
//!       |-- drain input events -> keypad / quit
//!       |-- at instruction rate: machine.step()
//!       `-- at 60Hz: tick timers, expire held keys, gate the bell,
//!           blit the framebuffer if dirty

pub mod display;
pub mod input;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod timer;

//! Producer → queue → consumer behaviour.

use std::sync::Arc;

use embassy_time::Duration;
use pico_tasks::app::system::ValueQueue;
use pico_tasks::config::QUEUE_CAPACITY;
use pico_tasks::error::Error;
use pico_tasks::workers::queue::Producer;

const SEND_TIMEOUT: Duration = Duration::from_millis(100);

#[test]
fn full_queue_times_out_and_counter_stalls() {
    let queue = Arc::new(ValueQueue::new().unwrap());
    let mut producer = Producer::new(Arc::clone(&queue), SEND_TIMEOUT);

    for _ in 0..QUEUE_CAPACITY {
        let start = std::time::Instant::now();
        assert_eq!(producer.offer(), Ok(()));
        assert!(start.elapsed() < std::time::Duration::from_millis(50));
    }
    assert_eq!(producer.counter(), QUEUE_CAPACITY as u32);

    let start = std::time::Instant::now();
    assert_eq!(producer.offer(), Err(Error::TimedOut));
    assert!(start.elapsed() >= std::time::Duration::from_millis(90));
    assert_eq!(producer.counter(), QUEUE_CAPACITY as u32);
    assert_eq!(queue.len(), QUEUE_CAPACITY);

    // The stalled value goes out once there is room.
    assert_eq!(queue.receive(Duration::from_ticks(0)), Ok(0));
    assert_eq!(producer.offer(), Ok(()));
    assert_eq!(producer.counter(), QUEUE_CAPACITY as u32 + 1);
}

#[test]
fn threads_see_every_value_in_order() {
    let queue = Arc::new(ValueQueue::new().unwrap());
    let tx = Arc::clone(&queue);
    let sender = std::thread::spawn(move || {
        let mut producer = Producer::new(tx, Duration::from_millis(500));
        while producer.counter() < 200 {
            producer.offer().unwrap();
        }
    });

    let mut seen = Vec::with_capacity(200);
    while seen.len() < 200 {
        if let Ok(v) = queue.receive(Duration::from_millis(500)) {
            assert!(queue.len() <= QUEUE_CAPACITY);
            seen.push(v);
        }
    }
    sender.join().unwrap();
    assert_eq!(seen, (0..200).collect::<Vec<u32>>());
}

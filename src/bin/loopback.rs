use md5link::{encode_request, md5_digest, Reassembler};

fn main() {
    // Same request the host-side driver sends: a short string repeated
    // until it spans many frames.
    let message: Vec<u8> = b"j(R1wzR*y[^GxWJ5B>L{-HLETRD".repeat(100);
    println!("request: {} bytes, expect {}", message.len(), md5_digest(&message));

    let mut session: Reassembler = Reassembler::new();
    for frame in encode_request(&message) {
        let resp = session.accept(&frame);
        if resp.is_ack() {
            println!("sent {} bytes ... ack", frame.len());
        } else {
            println!("sent {} bytes ... {}", frame.len(), String::from_utf8_lossy(resp.as_bytes()));
        }
    }
}

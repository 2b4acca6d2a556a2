use heapcache::ds::{Heap, HeapOrder};

/// Job ids ordered by deadline, remembering where each job sits.
struct ByDeadline {
    deadline: Vec<u32>,
    position: Vec<usize>,
}

impl HeapOrder<usize> for ByDeadline {
    fn better(&self, a: &usize, b: &usize) -> bool {
        self.deadline[*a] < self.deadline[*b]
    }

    fn placed(&mut self, job: &usize, index: usize) {
        self.position[*job] = index;
    }
}

fn main() {
    let deadlines = vec![30, 10, 50, 20];
    let order = ByDeadline {
        position: vec![0; deadlines.len()],
        deadline: deadlines,
    };
    let mut jobs = Heap::from_vec(vec![0, 1, 2, 3], order);

    println!("next: {:?}", jobs.peek());

    // Job 2 becomes urgent.
    jobs.order_mut().deadline[2] = 5;
    let pos = jobs.order().position[2];
    if let Err(err) = jobs.fix(pos) {
        eprintln!("fix failed: {}", err);
        return;
    }

    // Job 0 is cancelled.
    let pos = jobs.order().position[0];
    let _ = jobs.remove(pos);

    while let Ok(job) = jobs.pop() {
        println!("run job {}", job);
    }
}

// Expected output:
// next: Some(1)
// run job 2
// run job 1
// run job 3

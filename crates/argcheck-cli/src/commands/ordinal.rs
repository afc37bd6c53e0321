use argcheck_kernel::ordinal;

pub fn run(numbers: Vec<usize>) {
    for n in numbers {
        println!("{}", ordinal(n));
    }
}

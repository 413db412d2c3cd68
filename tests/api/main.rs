// fn main not required
mod health_check;
mod submissions;

// black-box tests are most robust, as they reflect exactly how the hosting
// platform interacts with the webhook (request type, path, query string)
//
// grouping all tests in a single dir keeps them in one executable: "While
// each executable is compiled in parallel, the linking phase is instead
// entirely sequential!"

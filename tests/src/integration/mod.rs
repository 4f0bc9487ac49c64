mod flows;
mod retention;

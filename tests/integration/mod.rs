mod universe;
